//! ---
//! cct_section: "01-core-functionality"
//! cct_subsection: "module"
//! cct_type: "source"
//! cct_scope: "code"
//! cct_description: "Shared primitives and utilities for the ColdTrace runtime."
//! cct_version: "v0.1.0"
//! cct_owner: "tbd"
//! ---
//! Shared primitives for the ColdTrace workspace.
//! This crate exposes configuration loading, logging setup, and the
//! simulated clock consumed across the workspace.

pub mod clock;
pub mod config;
pub mod logging;

pub use clock::SimClock;
pub use config::{
    AppConfig, LocationConfig, LoggingConfig, ScenarioConfig, SimulationConfig,
};
pub use logging::{init_tracing, LogFormat};
