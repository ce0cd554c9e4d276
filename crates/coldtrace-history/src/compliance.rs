//! ---
//! cct_section: "03-history-compliance"
//! cct_subsection: "module"
//! cct_type: "source"
//! cct_scope: "code"
//! cct_description: "Bounded reading history and compliance aggregation."
//! cct_version: "v0.1.0"
//! cct_owner: "tbd"
//! ---
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use coldtrace_sim::Severity;

use crate::store::{HistoryError, HistoryStore};

/// Largest accepted report window (one year of hourly buckets).
pub const MAX_WINDOW_HOURS: i64 = 8760;

/// Error type for compliance computation.
#[derive(Debug, thiserror::Error)]
pub enum ComplianceError {
    #[error(transparent)]
    History(#[from] HistoryError),
    /// Non-positive or absurdly large window.
    #[error("invalid report window of {0} hours")]
    InvalidWindow(i64),
    /// Zero readings in the window. Callers must distinguish this from a
    /// report with 0% compliance.
    #[error("no readings for '{location_id}' in the last {window_hours} hours")]
    NoData {
        location_id: String,
        window_hours: i64,
    },
}

/// Compliance metrics over one history window. Computed on demand, never
/// stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub location_id: String,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub total_readings: usize,
    pub safe_count: usize,
    pub warning_count: usize,
    pub critical_count: usize,
    pub excursion_count: usize,
    /// safe_count / total_readings.
    pub compliance_rate: f64,
    /// Safe readings times the sampling cadence.
    pub time_in_range_seconds: i64,
    pub min_temp_c: f64,
    pub avg_temp_c: f64,
    pub max_temp_c: f64,
}

/// Aggregate the window ending at `until` into a compliance report.
///
/// `cadence_seconds` is the simulated sampling interval and serves as the
/// time-in-range unit.
pub fn compute_compliance(
    store: &HistoryStore,
    location_id: &str,
    until: DateTime<Utc>,
    window_hours: i64,
    cadence_seconds: i64,
) -> Result<ComplianceReport, ComplianceError> {
    if window_hours <= 0 || window_hours > MAX_WINDOW_HOURS {
        return Err(ComplianceError::InvalidWindow(window_hours));
    }
    let since = until - Duration::hours(window_hours);
    let readings = store.query(location_id, since, until)?;
    if readings.is_empty() {
        return Err(ComplianceError::NoData {
            location_id: location_id.to_owned(),
            window_hours,
        });
    }

    let total_readings = readings.len();
    let mut safe_count = 0usize;
    let mut warning_count = 0usize;
    let mut critical_count = 0usize;
    let mut min_temp_c = f64::INFINITY;
    let mut max_temp_c = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for reading in &readings {
        match reading.severity {
            Severity::Safe => safe_count += 1,
            Severity::Warning => warning_count += 1,
            Severity::Critical => critical_count += 1,
        }
        min_temp_c = min_temp_c.min(reading.temperature_c);
        max_temp_c = max_temp_c.max(reading.temperature_c);
        sum += reading.temperature_c;
    }

    Ok(ComplianceReport {
        location_id: location_id.to_owned(),
        window_start: since,
        window_end: until,
        total_readings,
        safe_count,
        warning_count,
        critical_count,
        excursion_count: warning_count + critical_count,
        compliance_rate: safe_count as f64 / total_readings as f64,
        time_in_range_seconds: safe_count as i64 * cadence_seconds,
        min_temp_c,
        avg_temp_c: sum / total_readings as f64,
        max_temp_c,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use coldtrace_sim::Reading;

    const CADENCE: i64 = 900;

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap()
    }

    fn seed_store(temps: &[f64]) -> (HistoryStore, DateTime<Utc>) {
        let store = HistoryStore::new(["main_refrigerator"], 720);
        let mut at = epoch();
        for &t in temps {
            at += Duration::minutes(15);
            store
                .append(
                    Reading {
                        location_id: "main_refrigerator".to_owned(),
                        timestamp: at,
                        temperature_c: t,
                        scenario: "normal_operation".to_owned(),
                        severity: Severity::classify(t),
                        humidity_pct: 55.0,
                        battery_pct: 90,
                    },
                    None,
                )
                .unwrap();
        }
        (store, at)
    }

    #[test]
    fn aggregates_counts_and_rate() {
        let (store, end) = seed_store(&[4.0, 5.0, 8.5, 10.0, 6.0]);
        let report = compute_compliance(&store, "main_refrigerator", end, 24, CADENCE).unwrap();
        assert_eq!(report.total_readings, 5);
        assert_eq!(report.safe_count, 3);
        assert_eq!(report.warning_count, 1);
        assert_eq!(report.critical_count, 1);
        assert_eq!(report.excursion_count, 2);
        assert!((report.compliance_rate - 0.6).abs() < 1e-9);
        assert_eq!(report.time_in_range_seconds, 3 * CADENCE);
        assert_eq!(report.min_temp_c, 4.0);
        assert_eq!(report.max_temp_c, 10.0);
    }

    #[test]
    fn empty_window_is_no_data_not_zero_compliance() {
        let (store, end) = seed_store(&[]);
        let result = compute_compliance(&store, "main_refrigerator", end, 24, CADENCE);
        assert!(matches!(result, Err(ComplianceError::NoData { .. })));
    }

    #[test]
    fn rejects_non_positive_and_oversized_windows() {
        let (store, end) = seed_store(&[4.0]);
        assert!(matches!(
            compute_compliance(&store, "main_refrigerator", end, 0, CADENCE),
            Err(ComplianceError::InvalidWindow(0))
        ));
        assert!(matches!(
            compute_compliance(&store, "main_refrigerator", end, -6, CADENCE),
            Err(ComplianceError::InvalidWindow(-6))
        ));
        assert!(matches!(
            compute_compliance(&store, "main_refrigerator", end, MAX_WINDOW_HOURS + 1, CADENCE),
            Err(ComplianceError::InvalidWindow(_))
        ));
    }

    #[test]
    fn recomputation_over_closed_window_is_idempotent() {
        let (store, end) = seed_store(&[4.0, 9.5, 5.0, 2.0, 8.0]);
        let first = compute_compliance(&store, "main_refrigerator", end, 24, CADENCE).unwrap();
        let second = compute_compliance(&store, "main_refrigerator", end, 24, CADENCE).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn boundary_readings_count_as_safe() {
        let (store, end) = seed_store(&[2.0, 8.0]);
        let report = compute_compliance(&store, "main_refrigerator", end, 24, CADENCE).unwrap();
        assert_eq!(report.safe_count, 2);
        assert_eq!(report.compliance_rate, 1.0);
    }

    #[test]
    fn unknown_location_propagates() {
        let (store, end) = seed_store(&[4.0]);
        assert!(matches!(
            compute_compliance(&store, "attic_freezer", end, 24, CADENCE),
            Err(ComplianceError::History(HistoryError::UnknownLocation(_)))
        ));
    }
}
