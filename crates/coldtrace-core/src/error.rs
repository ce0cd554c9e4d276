//! ---
//! cct_section: "01-core-functionality"
//! cct_subsection: "module"
//! cct_type: "source"
//! cct_scope: "code"
//! cct_description: "Engine facade and tick orchestration."
//! cct_version: "v0.1.0"
//! cct_owner: "tbd"
//! ---
use coldtrace_history::{ComplianceError, HistoryError};
use thiserror::Error;

/// Result alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Recoverable validation errors surfaced to callers of the engine facade.
/// None are fatal; every operation either fully succeeds or fails with no
/// observable side effect.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown location '{0}'")]
    UnknownLocation(String),
    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),
    /// Zero readings in the requested window; distinct from 0% compliance.
    #[error("no readings for '{location_id}' in the last {window_hours} hours")]
    NoData {
        location_id: String,
        window_hours: i64,
    },
    #[error("invalid report window of {0} hours")]
    InvalidWindow(i64),
}

impl From<HistoryError> for EngineError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::UnknownLocation(id) => EngineError::UnknownLocation(id),
        }
    }
}

impl From<ComplianceError> for EngineError {
    fn from(err: ComplianceError) -> Self {
        match err {
            ComplianceError::History(inner) => inner.into(),
            ComplianceError::InvalidWindow(hours) => EngineError::InvalidWindow(hours),
            ComplianceError::NoData {
                location_id,
                window_hours,
            } => EngineError::NoData {
                location_id,
                window_hours,
            },
        }
    }
}
