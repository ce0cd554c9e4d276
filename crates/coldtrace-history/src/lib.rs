//! ---
//! cct_section: "03-history-compliance"
//! cct_subsection: "module"
//! cct_type: "source"
//! cct_scope: "code"
//! cct_description: "Bounded reading history and compliance aggregation."
//! cct_version: "v0.1.0"
//! cct_owner: "tbd"
//! ---
//! Bounded, append-only reading history and windowed compliance statistics.
//!
//! History is retained in memory only, per location, inside a configurable
//! retention horizon. No entry is mutated after append.

pub mod compliance;
pub mod store;

pub use compliance::{compute_compliance, ComplianceError, ComplianceReport};
pub use store::{HistoryError, HistoryStore};
