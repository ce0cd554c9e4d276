//! ---
//! cct_section: "11-simulation"
//! cct_subsection: "module"
//! cct_type: "source"
//! cct_scope: "code"
//! cct_description: "Temperature simulation engine and sensor fleet model."
//! cct_version: "v0.1.0"
//! cct_owner: "tbd"
//! ---
use std::f64::consts::PI;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

use crate::catalog::Scenario;
use crate::reading::{Reading, Severity};
use crate::registry::StorageLocation;

/// Absolute simulation bound; no emitted reading escapes this range.
pub const TEMP_FLOOR_C: f64 = -20.0;
pub const TEMP_CEIL_C: f64 = 40.0;

/// Exponential smoothing factor. Consecutive readings chase the target
/// gradually; a scenario change shifts the target, never the reading itself.
const SMOOTHING_ALPHA: f64 = 0.3;

/// Amplitudes for the smooth periodic cycles layered onto the base
/// temperature. Small by construction so scenario effects dominate.
const SEASONAL_AMPLITUDE_C: f64 = 0.8;
const DAILY_AMPLITUDE_C: f64 = 0.5;
const WEEKEND_OFFSET_C: f64 = 0.3;

/// Sensor noise for a perfectly reliable unit; scaled up as reliability
/// drops. Samples are clamped to three sigmas.
const BASE_NOISE_SIGMA_C: f64 = 0.15;
const NOISE_CLAMP_SIGMAS: f64 = 3.0;

/// Room temperature a unit drifts toward once cooling is lost.
const AMBIENT_C: f64 = 22.0;

/// Scenarios with at least this much drift model total cooling loss; their
/// malfunction events re-target ambient instead of a one-off spike.
const COOLING_LOSS_DRIFT_C: f64 = 6.0;

/// Mutable per-location simulation state, exclusively owned by the generator.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub current_temp_c: f64,
    pub active_scenario: Arc<Scenario>,
    pub tick_count: u64,
    pub last_update: DateTime<Utc>,
}

/// Advances one location's state by exactly one tick per call.
#[derive(Debug)]
pub struct ReadingGenerator {
    location: Arc<StorageLocation>,
    state: SimulationState,
    noise: Normal<f64>,
    noise_sigma: f64,
}

impl ReadingGenerator {
    pub fn new(
        location: Arc<StorageLocation>,
        initial_scenario: Arc<Scenario>,
        epoch: DateTime<Utc>,
    ) -> Self {
        // Variance scales inversely with reliability: a 0.85 unit is noisier
        // than a 0.95 one.
        let noise_sigma = BASE_NOISE_SIGMA_C / location.reliability.sqrt();
        let noise = Normal::new(0.0, noise_sigma).expect("noise sigma is positive");
        let state = SimulationState {
            current_temp_c: location.base_temp_c,
            active_scenario: initial_scenario,
            tick_count: 0,
            last_update: epoch,
        };
        Self {
            location,
            state,
            noise,
            noise_sigma,
        }
    }

    pub fn location(&self) -> &Arc<StorageLocation> {
        &self.location
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Advance one tick under the given scenario and emit the new reading.
    ///
    /// Manual injection and the scheduled loop both enter here, so demo
    /// excursions are indistinguishable in shape from drawn ones.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        scenario: &Arc<Scenario>,
        at: DateTime<Utc>,
        rng: &mut R,
    ) -> Reading {
        let mut target = self.location.base_temp_c
            + seasonal_offset(at)
            + daily_offset(at)
            + weekend_offset(at)
            + scenario.temp_drift_c;

        if scenario.malfunction_chance > 0.0 && rng.gen::<f64>() < scenario.malfunction_chance {
            if scenario.temp_drift_c >= COOLING_LOSS_DRIFT_C {
                // Active cooling gone; the unit chases room temperature.
                target = AMBIENT_C;
            } else {
                target += scenario.temp_drift_c * rng.gen_range(0.5..1.5);
            }
            debug!(
                location = %self.location.id,
                scenario = %scenario.name,
                target_c = target,
                "malfunction event"
            );
        }

        let raw_noise = self.noise.sample(rng);
        let bound = NOISE_CLAMP_SIGMAS * self.noise_sigma;
        let noise = raw_noise.clamp(-bound, bound);

        let smoothed = SMOOTHING_ALPHA * (target + noise)
            + (1.0 - SMOOTHING_ALPHA) * self.state.current_temp_c;
        let temperature_c = round_tenth(smoothed.clamp(TEMP_FLOOR_C, TEMP_CEIL_C));

        self.state.current_temp_c = temperature_c;
        self.state.active_scenario = scenario.clone();
        self.state.tick_count += 1;
        self.state.last_update = at;

        let severity = Severity::classify(temperature_c);
        let battery_pct = if severity == Severity::Critical {
            rng.gen_range(10..=50)
        } else {
            rng.gen_range(75..=100)
        };

        Reading {
            location_id: self.location.id.clone(),
            timestamp: at,
            temperature_c,
            scenario: scenario.name.clone(),
            severity,
            humidity_pct: round_tenth(rng.gen_range(45.0..75.0)),
            battery_pct,
        }
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Smooth annual cycle peaking mid-July.
fn seasonal_offset(at: DateTime<Utc>) -> f64 {
    let day = f64::from(at.ordinal()) - 1.0;
    SEASONAL_AMPLITUDE_C * (2.0 * PI * (day - 105.0) / 365.25).sin()
}

/// Smooth diurnal cycle peaking mid-afternoon.
fn daily_offset(at: DateTime<Utc>) -> f64 {
    let hour = f64::from(at.hour()) + f64::from(at.minute()) / 60.0;
    DAILY_AMPLITUDE_C * (2.0 * PI * (hour - 9.0) / 24.0).sin()
}

/// Weekends see less door traffic and slightly warmer plant rooms.
fn weekend_offset(at: DateTime<Utc>) -> f64 {
    match at.weekday() {
        Weekday::Sat | Weekday::Sun => WEEKEND_OFFSET_C,
        _ => 0.0,
    }
}
