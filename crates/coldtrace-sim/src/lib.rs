//! ---
//! cct_section: "11-simulation"
//! cct_subsection: "module"
//! cct_type: "source"
//! cct_scope: "code"
//! cct_description: "Temperature simulation engine and sensor fleet model."
//! cct_version: "v0.1.0"
//! cct_owner: "tbd"
//! ---
//! Stateful cold-chain temperature simulation.
//!
//! One [`ReadingGenerator`] per storage location advances that location's
//! state by exactly one tick, chasing a target temperature assembled from the
//! location's equilibrium, smooth seasonal/daily cycles, and the active
//! scenario's drift. All randomness flows through an explicit seeded source
//! so runs replay deterministically.

pub mod catalog;
pub mod generator;
pub mod reading;
pub mod registry;

pub use catalog::{Scenario, ScenarioCatalog};
pub use generator::{ReadingGenerator, SimulationState};
pub use reading::{Reading, Severity};
pub use registry::{LocationRegistry, StorageLocation};
