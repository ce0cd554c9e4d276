//! ---
//! cct_section: "01-core-functionality"
//! cct_subsection: "module"
//! cct_type: "source"
//! cct_scope: "code"
//! cct_description: "Shared primitives and utilities for the ColdTrace runtime."
//! cct_version: "v0.1.0"
//! cct_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use tracing::debug;

use crate::logging::LogFormat;

const WEIGHT_SUM_EPSILON: f64 = 1e-6;

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::StructuredJson
}

fn default_simulation_seed() -> u64 {
    0xC01DC8A1u64
}

fn default_tick_minutes() -> u32 {
    15
}

fn default_retention_hours() -> u32 {
    24 * 30
}

fn default_pace() -> Duration {
    Duration::from_secs(5)
}

fn default_system_event_chance() -> f64 {
    0.05
}

/// Primary configuration object for the ColdTrace runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_locations")]
    pub locations: IndexMap<String, LocationConfig>,
    #[serde(default = "default_scenarios")]
    pub scenarios: IndexMap<String, ScenarioConfig>,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &str = "COLDTRACE_CONFIG";

    /// Load configuration from disk, respecting the `COLDTRACE_CONFIG` override.
    /// Falls back to the built-in fleet when no candidate file exists.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(path.clone())?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(path.clone())?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        let config = AppConfig::default();
        config.validate()?;
        Ok(LoadedAppConfig {
            config,
            source: None,
        })
    }

    fn from_path(path: PathBuf) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Retrieve a location configuration by identifier.
    pub fn location(&self, location_id: &str) -> Option<&LocationConfig> {
        self.locations.get(location_id)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        if self.locations.is_empty() {
            return Err(anyhow!("configuration must declare at least one location"));
        }
        for (location_id, location) in &self.locations {
            location.validate(location_id)?;
        }
        if self.scenarios.is_empty() {
            return Err(anyhow!("configuration must declare at least one scenario"));
        }
        let weight_sum: f64 = self.scenarios.values().map(|s| s.weight).sum();
        if (weight_sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(anyhow!(
                "scenario weights must sum to 1.0 (got {})",
                weight_sum
            ));
        }
        for (name, scenario) in &self.scenarios {
            scenario.validate(name)?;
        }
        self.simulation.validate()?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            locations: default_locations(),
            scenarios: default_scenarios(),
            simulation: SimulationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// One monitored storage unit as declared in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    pub name: String,
    pub site: String,
    pub capacity_vials: u32,
    pub base_temp_c: f64,
    pub reliability: f64,
}

impl LocationConfig {
    pub fn validate(&self, location_id: &str) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(anyhow!("location '{}' must declare a name", location_id));
        }
        if !(self.reliability > 0.0 && self.reliability <= 1.0) {
            return Err(anyhow!(
                "location '{}' reliability must lie in (0, 1], got {}",
                location_id,
                self.reliability
            ));
        }
        Ok(())
    }
}

/// One operating condition with its perturbation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub weight: f64,
    pub temp_drift_c: f64,
    pub malfunction_chance: f64,
}

impl ScenarioConfig {
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.weight < 0.0 {
            return Err(anyhow!("scenario '{}' weight must be non-negative", name));
        }
        if !(0.0..=1.0).contains(&self.malfunction_chance) {
            return Err(anyhow!(
                "scenario '{}' malfunction_chance must lie in [0, 1], got {}",
                name,
                self.malfunction_chance
            ));
        }
        Ok(())
    }
}

/// Simulation pacing and tuning knobs.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seed for the pseudo-random source; fixed seeds replay identical runs.
    #[serde(default = "default_simulation_seed")]
    pub seed: u64,
    /// Simulated minutes represented by one tick.
    #[serde(default = "default_tick_minutes")]
    pub tick_minutes: u32,
    /// History retention horizon in simulated hours.
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u32,
    /// Wall-clock pause between ticks in the daemon loop.
    #[serde(default = "default_pace")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub pace: Duration,
    /// Per-tick probability of a synthetic system event (maintenance,
    /// calibration, battery, communication).
    #[serde(default = "default_system_event_chance")]
    pub system_event_chance: f64,
    /// Simulated epoch; defaults to process start when unset.
    #[serde(default)]
    pub epoch: Option<chrono::DateTime<chrono::Utc>>,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_minutes == 0 {
            return Err(anyhow!("simulation tick_minutes must be positive"));
        }
        if self.retention_hours == 0 {
            return Err(anyhow!("simulation retention_hours must be positive"));
        }
        if !(0.0..=1.0).contains(&self.system_event_chance) {
            return Err(anyhow!(
                "simulation system_event_chance must lie in [0, 1], got {}",
                self.system_event_chance
            ));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: default_simulation_seed(),
            tick_minutes: default_tick_minutes(),
            retention_hours: default_retention_hours(),
            pace: default_pace(),
            system_event_chance: default_system_event_chance(),
            epoch: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
        }
    }
}

fn location(
    name: &str,
    site: &str,
    capacity_vials: u32,
    base_temp_c: f64,
    reliability: f64,
) -> LocationConfig {
    LocationConfig {
        name: name.to_owned(),
        site: site.to_owned(),
        capacity_vials,
        base_temp_c,
        reliability,
    }
}

/// The stock pharmacy fleet used when no configuration file is present.
fn default_locations() -> IndexMap<String, LocationConfig> {
    let mut locations = IndexMap::new();
    locations.insert(
        "main_refrigerator".to_owned(),
        location(
            "Main Vaccine Refrigerator",
            "Pharmacy Storage Room A",
            500,
            4.5,
            0.95,
        ),
    );
    locations.insert(
        "backup_fridge".to_owned(),
        location(
            "Backup Cold Storage",
            "Emergency Storage Room B",
            200,
            3.5,
            0.90,
        ),
    );
    locations.insert(
        "transport_cooler".to_owned(),
        location("Mobile Transport Unit", "Delivery Vehicle #3", 50, 6.0, 0.85),
    );
    locations.insert(
        "clinic_fridge".to_owned(),
        location("Clinic Refrigerator", "Vaccination Center", 100, 5.5, 0.88),
    );
    locations
}

fn scenario(weight: f64, temp_drift_c: f64, malfunction_chance: f64) -> ScenarioConfig {
    ScenarioConfig {
        weight,
        temp_drift_c,
        malfunction_chance,
    }
}

fn default_scenarios() -> IndexMap<String, ScenarioConfig> {
    let mut scenarios = IndexMap::new();
    scenarios.insert("normal_operation".to_owned(), scenario(0.70, 0.0, 0.0));
    scenarios.insert("minor_fluctuation".to_owned(), scenario(0.15, 1.0, 0.05));
    scenarios.insert("door_opening".to_owned(), scenario(0.10, 2.5, 0.1));
    scenarios.insert("cooling_failure".to_owned(), scenario(0.03, 5.0, 0.5));
    scenarios.insert("power_outage".to_owned(), scenario(0.02, 8.0, 0.8));
    scenarios
}
