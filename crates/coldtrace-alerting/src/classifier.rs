//! ---
//! cct_section: "07-alerting"
//! cct_subsection: "module"
//! cct_type: "source"
//! cct_scope: "code"
//! cct_description: "Severity classification and recommended actions."
//! cct_version: "v0.1.0"
//! cct_owner: "tbd"
//! ---
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use coldtrace_sim::reading::{Reading, Severity, SAFE_MAX_C, SAFE_MIN_C};

use crate::actions::recommended_actions;

/// Alert severity as surfaced to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertLevel {
    Critical,
    Warning,
    Info,
}

/// What the alert is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertCategory {
    Excursion,
    Maintenance,
    Calibration,
    Battery,
    Communication,
}

/// An alert raised against a location. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub location_id: String,
    pub timestamp: DateTime<Utc>,
    pub level: AlertLevel,
    pub category: AlertCategory,
    pub message: String,
    pub recommended_actions: Vec<String>,
}

/// Classify a reading against the fixed thresholds.
///
/// Pure function: safe readings produce no alert, warning and critical
/// excursions carry the level-specific action list.
pub fn classify(reading: &Reading) -> Option<Alert> {
    let level = match reading.severity {
        Severity::Safe => return None,
        Severity::Warning => AlertLevel::Warning,
        Severity::Critical => AlertLevel::Critical,
    };
    let message = format!(
        "Temperature {:.1}°C is outside the safe range ({:.1}°C – {:.1}°C)",
        reading.temperature_c, SAFE_MIN_C, SAFE_MAX_C
    );
    Some(Alert {
        id: Uuid::new_v4(),
        location_id: reading.location_id.clone(),
        timestamp: reading.timestamp,
        level,
        category: AlertCategory::Excursion,
        message,
        recommended_actions: recommended_actions(level, AlertCategory::Excursion),
    })
}

/// Build a synthetic system event alert (maintenance, calibration, battery,
/// communication). Info level unless explicitly escalated by the caller.
pub fn system_event(
    location_id: &str,
    at: DateTime<Utc>,
    category: AlertCategory,
    level: AlertLevel,
    message: impl Into<String>,
) -> Alert {
    Alert {
        id: Uuid::new_v4(),
        location_id: location_id.to_owned(),
        timestamp: at,
        level,
        category,
        message: message.into(),
        recommended_actions: recommended_actions(level, category),
    }
}
