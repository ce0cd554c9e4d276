//! ---
//! cct_section: "01-core-functionality"
//! cct_subsection: "module"
//! cct_type: "source"
//! cct_scope: "code"
//! cct_description: "Shared primitives and utilities for the ColdTrace runtime."
//! cct_version: "v0.1.0"
//! cct_owner: "tbd"
//! ---
use chrono::{DateTime, Duration, Utc};

/// Simulated clock advancing a fixed step per tick.
///
/// The sampling cadence (nominally one reading per 15 simulated minutes) is
/// decoupled from how fast the daemon actually ticks, so demo runs can
/// compress days of history into seconds without distorting timestamps.
#[derive(Debug, Clone)]
pub struct SimClock {
    now: DateTime<Utc>,
    step: Duration,
}

impl SimClock {
    pub fn new(epoch: DateTime<Utc>, step_minutes: u32) -> Self {
        Self {
            now: epoch,
            step: Duration::minutes(i64::from(step_minutes)),
        }
    }

    /// Simulated time of the most recent tick.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Simulated seconds between consecutive readings.
    pub fn step_seconds(&self) -> i64 {
        self.step.num_seconds()
    }

    /// Advance one tick and return the new simulated time.
    pub fn advance(&mut self) -> DateTime<Utc> {
        self.now += self.step;
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn advances_by_fixed_step() {
        let epoch = Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
        let mut clock = SimClock::new(epoch, 15);
        assert_eq!(clock.now(), epoch);
        let next = clock.advance();
        assert_eq!((next - epoch).num_minutes(), 15);
        clock.advance();
        clock.advance();
        assert_eq!((clock.now() - epoch).num_minutes(), 45);
    }

    #[test]
    fn step_seconds_matches_cadence() {
        let epoch = Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
        let clock = SimClock::new(epoch, 15);
        assert_eq!(clock.step_seconds(), 900);
    }
}
