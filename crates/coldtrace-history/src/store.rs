//! ---
//! cct_section: "03-history-compliance"
//! cct_subsection: "module"
//! cct_type: "source"
//! cct_scope: "code"
//! cct_description: "Bounded reading history and compliance aggregation."
//! cct_version: "v0.1.0"
//! cct_owner: "tbd"
//! ---
use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use tracing::trace;

use coldtrace_alerting::Alert;
use coldtrace_sim::Reading;

/// Result alias used throughout the history crate.
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Error type for history lookups.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The location id was never registered with the store.
    #[error("unknown location '{0}'")]
    UnknownLocation(String),
}

#[derive(Debug, Default)]
struct LocationHistory {
    readings: VecDeque<Reading>,
    alerts: VecDeque<Alert>,
}

/// Per-location, strictly append-only, time-ordered log of readings and
/// alerts, bounded by a retention horizon enforced on insert.
///
/// The location map is fixed at construction; each entry sits behind its own
/// lock so appends for different locations never contend, and readers observe
/// a consistent prefix of each log.
#[derive(Debug)]
pub struct HistoryStore {
    retention: Duration,
    locations: HashMap<String, RwLock<LocationHistory>>,
}

impl HistoryStore {
    pub fn new<I, S>(location_ids: I, retention_hours: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let locations = location_ids
            .into_iter()
            .map(|id| (id.into(), RwLock::new(LocationHistory::default())))
            .collect();
        Self {
            retention: Duration::hours(i64::from(retention_hours)),
            locations,
        }
    }

    /// Append a reading and its optional excursion alert.
    pub fn append(&self, reading: Reading, alert: Option<Alert>) -> Result<()> {
        let slot = self.slot(&reading.location_id)?;
        let mut history = slot.write();
        let horizon = reading.timestamp - self.retention;
        evict_before(&mut history, horizon);
        trace!(
            location = %reading.location_id,
            temperature_c = reading.temperature_c,
            "reading appended"
        );
        history.readings.push_back(reading);
        if let Some(alert) = alert {
            history.alerts.push_back(alert);
        }
        Ok(())
    }

    /// Append a standalone alert (synthetic system events).
    pub fn append_alert(&self, alert: Alert) -> Result<()> {
        let slot = self.slot(&alert.location_id)?;
        slot.write().alerts.push_back(alert);
        Ok(())
    }

    /// Readings inside `[since, until]`, oldest first.
    pub fn query(
        &self,
        location_id: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Reading>> {
        let slot = self.slot(location_id)?;
        let history = slot.read();
        Ok(history
            .readings
            .iter()
            .filter(|r| r.timestamp >= since && r.timestamp <= until)
            .cloned()
            .collect())
    }

    /// The most recently appended reading, if any.
    pub fn latest(&self, location_id: &str) -> Result<Option<Reading>> {
        let slot = self.slot(location_id)?;
        Ok(slot.read().readings.back().cloned())
    }

    /// Alerts at or after `since`, oldest first.
    pub fn alerts_since(&self, location_id: &str, since: DateTime<Utc>) -> Result<Vec<Alert>> {
        let slot = self.slot(location_id)?;
        let history = slot.read();
        Ok(history
            .alerts
            .iter()
            .filter(|a| a.timestamp >= since)
            .cloned()
            .collect())
    }

    /// Number of retained readings for a location.
    pub fn len(&self, location_id: &str) -> Result<usize> {
        let slot = self.slot(location_id)?;
        Ok(slot.read().readings.len())
    }

    pub fn is_empty(&self, location_id: &str) -> Result<bool> {
        Ok(self.len(location_id)? == 0)
    }

    fn slot(&self, location_id: &str) -> Result<&RwLock<LocationHistory>> {
        self.locations
            .get(location_id)
            .ok_or_else(|| HistoryError::UnknownLocation(location_id.to_owned()))
    }
}

fn evict_before(history: &mut LocationHistory, horizon: DateTime<Utc>) {
    while history
        .readings
        .front()
        .is_some_and(|r| r.timestamp < horizon)
    {
        history.readings.pop_front();
    }
    while history.alerts.front().is_some_and(|a| a.timestamp < horizon) {
        history.alerts.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use coldtrace_sim::Severity;

    fn reading(location_id: &str, at: DateTime<Utc>, temperature_c: f64) -> Reading {
        Reading {
            location_id: location_id.to_owned(),
            timestamp: at,
            temperature_c,
            scenario: "normal_operation".to_owned(),
            severity: Severity::classify(temperature_c),
            humidity_pct: 55.0,
            battery_pct: 92,
        }
    }

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap()
    }

    #[test]
    fn query_returns_window_oldest_first() {
        let store = HistoryStore::new(["main_refrigerator"], 720);
        let mut at = epoch();
        for i in 0..10 {
            at += Duration::minutes(15);
            store
                .append(reading("main_refrigerator", at, 4.0 + f64::from(i) * 0.1), None)
                .unwrap();
        }
        let since = epoch() + Duration::minutes(30);
        let until = epoch() + Duration::minutes(90);
        let window = store.query("main_refrigerator", since, until).unwrap();
        assert_eq!(window.len(), 5);
        assert!(window.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn latest_tracks_most_recent_append() {
        let store = HistoryStore::new(["backup_fridge"], 720);
        assert!(store.latest("backup_fridge").unwrap().is_none());
        store
            .append(reading("backup_fridge", epoch(), 3.6), None)
            .unwrap();
        store
            .append(
                reading("backup_fridge", epoch() + Duration::minutes(15), 3.8),
                None,
            )
            .unwrap();
        let latest = store.latest("backup_fridge").unwrap().unwrap();
        assert_eq!(latest.temperature_c, 3.8);
    }

    #[test]
    fn unknown_location_is_rejected() {
        let store = HistoryStore::new(["clinic_fridge"], 720);
        assert!(matches!(
            store.latest("garage_freezer"),
            Err(HistoryError::UnknownLocation(_))
        ));
        assert!(store
            .append(reading("garage_freezer", epoch(), 4.0), None)
            .is_err());
    }

    #[test]
    fn retention_evicts_entries_outside_horizon() {
        let store = HistoryStore::new(["transport_cooler"], 1);
        let mut at = epoch();
        for _ in 0..8 {
            at += Duration::minutes(15);
            store
                .append(reading("transport_cooler", at, 6.0), None)
                .unwrap();
        }
        // One hour horizon keeps the final four 15-minute samples plus the
        // one exactly on the boundary.
        let retained = store.len("transport_cooler").unwrap();
        assert!(retained <= 5, "retained {}", retained);
        let oldest = store
            .query("transport_cooler", epoch(), at)
            .unwrap()
            .first()
            .unwrap()
            .timestamp;
        assert!(at - oldest <= Duration::hours(1));
    }

    #[test]
    fn alerts_filtered_by_since() {
        use coldtrace_alerting::{system_event, AlertCategory, AlertLevel};
        let store = HistoryStore::new(["main_refrigerator"], 720);
        let early = system_event(
            "main_refrigerator",
            epoch(),
            AlertCategory::Maintenance,
            AlertLevel::Info,
            "Scheduled maintenance check due",
        );
        let late = system_event(
            "main_refrigerator",
            epoch() + Duration::hours(2),
            AlertCategory::Battery,
            AlertLevel::Info,
            "Sensor battery low",
        );
        store.append_alert(early).unwrap();
        store.append_alert(late).unwrap();
        let alerts = store
            .alerts_since("main_refrigerator", epoch() + Duration::hours(1))
            .unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category, AlertCategory::Battery);
    }
}
