//! ---
//! cct_section: "01-core-functionality"
//! cct_subsection: "module"
//! cct_type: "source"
//! cct_scope: "code"
//! cct_description: "Engine facade and tick orchestration."
//! cct_version: "v0.1.0"
//! cct_owner: "tbd"
//! ---
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use coldtrace_alerting::AlertCategory;

/// A synthetic system event the orchestrator wants raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemEvent {
    pub location_id: String,
    pub category: AlertCategory,
    pub message: String,
}

/// Occasionally produces non-temperature system events (maintenance due,
/// calibration check, battery low, telemetry gap) on the orchestrator's own
/// schedule, independent of readings.
#[derive(Debug)]
pub struct SystemEventScheduler {
    rng: StdRng,
    chance: f64,
}

impl SystemEventScheduler {
    pub fn new(seed: u64, chance: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            chance,
        }
    }

    /// Roll once per tick; most polls yield nothing.
    pub fn poll(&mut self, location_ids: &[String]) -> Option<SystemEvent> {
        if location_ids.is_empty() || self.rng.gen::<f64>() >= self.chance {
            return None;
        }
        let location_id = location_ids[self.rng.gen_range(0..location_ids.len())].clone();
        let (category, message) = match self.rng.gen_range(0..4u8) {
            0 => (
                AlertCategory::Maintenance,
                "Scheduled maintenance check due for temperature sensors",
            ),
            1 => (
                AlertCategory::Calibration,
                "Temperature sensor calibration recommended",
            ),
            2 => (AlertCategory::Battery, "Sensor battery level is running low"),
            _ => (
                AlertCategory::Communication,
                "Sensor uplink missed its last check-in",
            ),
        };
        Some(SystemEvent {
            location_id,
            category,
            message: message.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fleet() -> Vec<String> {
        vec!["main_refrigerator".to_owned(), "clinic_fridge".to_owned()]
    }

    #[test]
    fn zero_chance_never_emits() {
        let mut scheduler = SystemEventScheduler::new(1, 0.0);
        for _ in 0..1_000 {
            assert!(scheduler.poll(&fleet()).is_none());
        }
    }

    #[test]
    fn certain_chance_always_emits_known_locations() {
        let mut scheduler = SystemEventScheduler::new(2, 1.0);
        let fleet = fleet();
        for _ in 0..100 {
            let event = scheduler.poll(&fleet).unwrap();
            assert!(fleet.contains(&event.location_id));
            assert!(!event.message.is_empty());
        }
    }

    #[test]
    fn emission_rate_tracks_chance() {
        let mut scheduler = SystemEventScheduler::new(3, 0.05);
        let fleet = fleet();
        let trials = 10_000;
        let emitted = (0..trials).filter(|_| scheduler.poll(&fleet).is_some()).count();
        let rate = emitted as f64 / trials as f64;
        assert!((rate - 0.05).abs() < 0.01, "rate {}", rate);
    }

    #[test]
    fn empty_fleet_emits_nothing() {
        let mut scheduler = SystemEventScheduler::new(4, 1.0);
        assert!(scheduler.poll(&[]).is_none());
    }
}
