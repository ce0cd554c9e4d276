//! ---
//! cct_section: "01-core-functionality"
//! cct_subsection: "module"
//! cct_type: "source"
//! cct_scope: "code"
//! cct_description: "Engine facade and tick orchestration."
//! cct_version: "v0.1.0"
//! cct_owner: "tbd"
//! ---
//! Engine facade and tick orchestration for ColdTrace.
//!
//! The [`Engine`] owns all per-location simulation state and exposes the
//! operations consumed by external presentation layers; the [`Orchestrator`]
//! paces `tick()` on a wall-clock interval and raises synthetic system
//! events on its own schedule.

pub mod engine;
pub mod error;
pub mod events;
pub mod orchestrator;

pub use engine::{Engine, FleetHealth, FleetSummary};
pub use error::{EngineError, Result};
pub use events::{SystemEvent, SystemEventScheduler};
pub use orchestrator::Orchestrator;
