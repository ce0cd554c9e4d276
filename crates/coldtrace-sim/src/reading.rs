//! ---
//! cct_section: "11-simulation"
//! cct_subsection: "module"
//! cct_type: "source"
//! cct_scope: "code"
//! cct_description: "Temperature simulation engine and sensor fleet model."
//! cct_version: "v0.1.0"
//! cct_owner: "tbd"
//! ---
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Documented safe band for vaccine storage, closed on both ends.
pub const SAFE_MIN_C: f64 = 2.0;
pub const SAFE_MAX_C: f64 = 8.0;
/// Warning margin on either side of the safe band.
pub const WARNING_MARGIN_C: f64 = 1.0;

/// Severity of a single reading against the fixed storage thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Safe,
    Warning,
    Critical,
}

impl Severity {
    /// Classify a temperature. 2.0 and 8.0 are safe; the warning bands are
    /// [1, 2) and (8, 9]; anything beyond is critical.
    pub fn classify(temperature_c: f64) -> Self {
        if (SAFE_MIN_C..=SAFE_MAX_C).contains(&temperature_c) {
            Severity::Safe
        } else if temperature_c >= SAFE_MIN_C - WARNING_MARGIN_C
            && temperature_c <= SAFE_MAX_C + WARNING_MARGIN_C
        {
            Severity::Warning
        } else {
            Severity::Critical
        }
    }

    pub fn is_safe(self) -> bool {
        matches!(self, Severity::Safe)
    }

    /// Whether the reading counts as a temperature excursion.
    pub fn is_excursion(self) -> bool {
        !self.is_safe()
    }
}

/// One emitted sensor sample. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    pub location_id: String,
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    /// Scenario active when the sample was produced.
    pub scenario: String,
    /// Cached classification of `temperature_c`.
    pub severity: Severity,
    pub humidity_pct: f64,
    pub battery_pct: u8,
}
