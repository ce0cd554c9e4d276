//! ---
//! cct_section: "07-alerting"
//! cct_subsection: "module"
//! cct_type: "source"
//! cct_scope: "code"
//! cct_description: "Severity classification and recommended actions."
//! cct_version: "v0.1.0"
//! cct_owner: "tbd"
//! ---
//! Alert classification for cold-chain readings.
//!
//! Excursion alerts derive purely from a reading's temperature against the
//! fixed storage thresholds. Other categories (maintenance, calibration,
//! battery, communication) are synthetic system events raised by the
//! orchestrator on its own schedule.

pub mod actions;
pub mod classifier;

pub use classifier::{classify, system_event, Alert, AlertCategory, AlertLevel};
