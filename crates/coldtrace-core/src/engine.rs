//! ---
//! cct_section: "01-core-functionality"
//! cct_subsection: "module"
//! cct_type: "source"
//! cct_scope: "code"
//! cct_description: "Engine facade and tick orchestration."
//! cct_version: "v0.1.0"
//! cct_owner: "tbd"
//! ---
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use coldtrace_alerting::{classify, system_event, Alert, AlertCategory, AlertLevel};
use coldtrace_common::{AppConfig, SimClock};
use coldtrace_history::{compute_compliance, ComplianceReport, HistoryStore};
use coldtrace_sim::{
    LocationRegistry, Reading, ReadingGenerator, Scenario, ScenarioCatalog, Severity,
    StorageLocation,
};

use crate::error::{EngineError, Result};

/// A drawn scenario dwells for this many ticks before the next draw,
/// mirroring how real operating conditions persist across samples.
const DWELL_TICKS_MIN: u32 = 1;
const DWELL_TICKS_MAX: u32 = 8;

/// Window bounds accepted by the history/alert/compliance queries.
const MAX_QUERY_HOURS: i64 = coldtrace_history::compliance::MAX_WINDOW_HOURS;

/// Mutable per-location slot. One mutation in flight at a time per location:
/// the slot lock serializes scheduled ticks against manual injection.
struct LocationSlot {
    generator: ReadingGenerator,
    active: Arc<Scenario>,
    dwell_remaining: u32,
    rng: StdRng,
}

impl std::fmt::Debug for LocationSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationSlot")
            .field("location", &self.generator.location().id)
            .field("active", &self.active.name)
            .field("dwell_remaining", &self.dwell_remaining)
            .finish()
    }
}

/// The simulation engine: owns every location's state, the scenario catalog,
/// and the retained history. Shared via `Arc` into the daemon loop and any
/// presentation layer; no process-wide singletons.
#[derive(Debug)]
pub struct Engine {
    registry: LocationRegistry,
    catalog: ScenarioCatalog,
    history: HistoryStore,
    slots: HashMap<String, Mutex<LocationSlot>>,
    clock: Mutex<SimClock>,
    cadence_seconds: i64,
}

impl Engine {
    /// Build an engine from validated configuration. The seed fixes every
    /// random stream, so equal configs replay equal runs.
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let registry = LocationRegistry::from_config(&config.locations);
        let catalog = ScenarioCatalog::from_config(&config.scenarios)?;
        let epoch = config.simulation.epoch.unwrap_or_else(Utc::now);
        let clock = SimClock::new(epoch, config.simulation.tick_minutes);
        let cadence_seconds = clock.step_seconds();
        let history = HistoryStore::new(registry.ids(), config.simulation.retention_hours);

        let mut slots = HashMap::new();
        for (index, location) in registry.list().enumerate() {
            // Decorrelated per-location stream so locations evolve
            // independently under one configured seed.
            let mut rng = StdRng::seed_from_u64(
                config
                    .simulation
                    .seed
                    .wrapping_add((index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)),
            );
            let initial = catalog.draw(&mut rng).clone();
            let generator = ReadingGenerator::new(location.clone(), initial.clone(), epoch);
            slots.insert(
                location.id.clone(),
                Mutex::new(LocationSlot {
                    generator,
                    active: initial,
                    dwell_remaining: 0,
                    rng,
                }),
            );
        }

        info!(
            locations = registry.len(),
            scenarios = catalog.names().count(),
            seed = config.simulation.seed,
            "engine initialised"
        );
        Ok(Self {
            registry,
            catalog,
            history,
            slots,
            clock: Mutex::new(clock),
            cadence_seconds,
        })
    }

    /// Simulated sampling interval in seconds.
    pub fn cadence_seconds(&self) -> i64 {
        self.cadence_seconds
    }

    /// Simulated time of the most recent tick.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.lock().now()
    }

    /// All registered storage locations, in declaration order.
    pub fn list_locations(&self) -> Vec<StorageLocation> {
        self.registry.list().map(|l| (**l).clone()).collect()
    }

    /// Advance every registered location by one simulated interval.
    pub fn tick(&self) -> Result<()> {
        let now = self.clock.lock().advance();
        for id in self.registry.ids() {
            let slot = self
                .slots
                .get(id)
                .ok_or_else(|| EngineError::UnknownLocation(id.to_owned()))?;
            let mut slot = slot.lock();
            if slot.dwell_remaining == 0 {
                let drawn = self.catalog.draw(&mut slot.rng).clone();
                slot.dwell_remaining = slot.rng.gen_range(DWELL_TICKS_MIN..=DWELL_TICKS_MAX);
                slot.active = drawn;
            }
            slot.dwell_remaining -= 1;
            let scenario = slot.active.clone();
            self.advance_slot(&mut slot, &scenario, now)?;
        }
        Ok(())
    }

    /// Manually force a scenario on one location and emit the resulting
    /// reading. Flows through the identical generation, classification, and
    /// storage pipeline as a scheduled tick, so demo excursions look exactly
    /// like organic ones.
    pub fn inject_scenario(&self, location_id: &str, scenario_name: &str) -> Result<Reading> {
        let scenario = self
            .catalog
            .get(scenario_name)
            .ok_or_else(|| EngineError::UnknownScenario(scenario_name.to_owned()))?
            .clone();
        let slot = self
            .slots
            .get(location_id)
            .ok_or_else(|| EngineError::UnknownLocation(location_id.to_owned()))?;
        let now = self.clock.lock().advance();
        let mut slot = slot.lock();
        // The injected condition persists through the dwell, so following
        // ticks keep chasing its target.
        slot.active = scenario.clone();
        slot.dwell_remaining = slot.rng.gen_range(DWELL_TICKS_MIN..=DWELL_TICKS_MAX);
        info!(location = location_id, scenario = scenario_name, "scenario injected");
        self.advance_slot(&mut slot, &scenario, now)
    }

    fn advance_slot(
        &self,
        slot: &mut LocationSlot,
        scenario: &Arc<Scenario>,
        now: DateTime<Utc>,
    ) -> Result<Reading> {
        let reading = slot.generator.advance(scenario, now, &mut slot.rng);
        let alert = classify(&reading);
        if let Some(alert) = &alert {
            debug!(
                location = %reading.location_id,
                temperature_c = reading.temperature_c,
                level = %alert.level,
                "excursion alert"
            );
        }
        self.history.append(reading.clone(), alert)?;
        Ok(reading)
    }

    /// Latest stored reading for a location.
    pub fn current_reading(&self, location_id: &str) -> Result<Reading> {
        self.history
            .latest(location_id)?
            .ok_or_else(|| EngineError::NoData {
                location_id: location_id.to_owned(),
                window_hours: 0,
            })
    }

    /// Readings over the trailing window, oldest first.
    pub fn history(&self, location_id: &str, hours: i64) -> Result<Vec<Reading>> {
        validate_window(hours)?;
        let until = self.now();
        let since = until - chrono::Duration::hours(hours);
        Ok(self.history.query(location_id, since, until)?)
    }

    /// Alerts over the trailing window, oldest first.
    pub fn alerts(&self, location_id: &str, hours: i64) -> Result<Vec<Alert>> {
        validate_window(hours)?;
        let since = self.now() - chrono::Duration::hours(hours);
        Ok(self.history.alerts_since(location_id, since)?)
    }

    /// Compliance statistics over the trailing window.
    pub fn compliance_report(&self, location_id: &str, hours: i64) -> Result<ComplianceReport> {
        // Unknown ids surface as UnknownLocation even when the window is
        // empty, so callers can tell the two apart.
        if self.registry.get(location_id).is_none() {
            return Err(EngineError::UnknownLocation(location_id.to_owned()));
        }
        Ok(compute_compliance(
            &self.history,
            location_id,
            self.now(),
            hours,
            self.cadence_seconds,
        )?)
    }

    /// Raise a synthetic system event (maintenance, calibration, battery,
    /// communication) against a location and store it.
    pub fn record_system_event(
        &self,
        location_id: &str,
        category: AlertCategory,
        level: AlertLevel,
        message: impl Into<String>,
    ) -> Result<Alert> {
        if self.registry.get(location_id).is_none() {
            return Err(EngineError::UnknownLocation(location_id.to_owned()));
        }
        let alert = system_event(location_id, self.now(), category, level, message);
        self.history.append_alert(alert.clone())?;
        Ok(alert)
    }

    /// Roll the latest reading of every location into a fleet-wide summary.
    pub fn fleet_summary(&self) -> FleetSummary {
        let mut safe_count = 0usize;
        let mut warning_count = 0usize;
        let mut critical_count = 0usize;
        let mut temp_sum = 0.0;
        let mut reliability_sum = 0.0;
        let mut reporting = 0usize;
        for location in self.registry.list() {
            let Ok(Some(reading)) = self.history.latest(&location.id) else {
                continue;
            };
            match reading.severity {
                Severity::Safe => safe_count += 1,
                Severity::Warning => warning_count += 1,
                Severity::Critical => critical_count += 1,
            }
            temp_sum += reading.temperature_c;
            reliability_sum += location.reliability;
            reporting += 1;
        }
        let health_score = if reporting == 0 {
            0.0
        } else {
            (safe_count as f64 * 100.0 + warning_count as f64 * 60.0) / reporting as f64
        };
        FleetSummary {
            total_locations: self.registry.len(),
            reporting,
            safe_count,
            warning_count,
            critical_count,
            active_alerts: warning_count + critical_count,
            average_temp_c: if reporting == 0 {
                0.0
            } else {
                temp_sum / reporting as f64
            },
            average_reliability: if reporting == 0 {
                0.0
            } else {
                reliability_sum / reporting as f64
            },
            health_score,
            health: FleetHealth::from_score(health_score),
            last_updated: self.now(),
        }
    }
}

fn validate_window(hours: i64) -> Result<()> {
    if hours <= 0 || hours > MAX_QUERY_HOURS {
        return Err(EngineError::InvalidWindow(hours));
    }
    Ok(())
}

/// Coarse fleet health band derived from the health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FleetHealth {
    Excellent,
    Good,
    NeedsAttention,
    Critical,
}

impl FleetHealth {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            FleetHealth::Excellent
        } else if score >= 70.0 {
            FleetHealth::Good
        } else if score >= 50.0 {
            FleetHealth::NeedsAttention
        } else {
            FleetHealth::Critical
        }
    }
}

/// Fleet-wide rollup of the latest severities. Derived view, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetSummary {
    pub total_locations: usize,
    /// Locations with at least one stored reading.
    pub reporting: usize,
    pub safe_count: usize,
    pub warning_count: usize,
    pub critical_count: usize,
    pub active_alerts: usize,
    pub average_temp_c: f64,
    pub average_reliability: f64,
    pub health_score: f64,
    pub health: FleetHealth,
    pub last_updated: DateTime<Utc>,
}
