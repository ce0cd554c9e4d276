//! ---
//! cct_section: "11-simulation"
//! cct_subsection: "module"
//! cct_type: "source"
//! cct_scope: "code"
//! cct_description: "Temperature simulation engine and sensor fleet model."
//! cct_version: "v0.1.0"
//! cct_owner: "tbd"
//! ---
use std::sync::Arc;

use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

use coldtrace_common::config::ScenarioConfig;

const WEIGHT_SUM_EPSILON: f64 = 1e-6;

/// A named operating condition with its perturbation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Probability mass for the weighted draw; catalog weights sum to 1.0.
    pub weight: f64,
    /// Offset applied to the target temperature while the scenario is active.
    pub temp_drift_c: f64,
    /// Probability of an additional discrete failure event per tick.
    pub malfunction_chance: f64,
}

/// Weighted set of operating conditions, shared read-only by all locations.
#[derive(Debug, Clone)]
pub struct ScenarioCatalog {
    scenarios: IndexMap<String, Arc<Scenario>>,
    total_weight: f64,
}

impl ScenarioCatalog {
    pub fn from_config(configs: &IndexMap<String, ScenarioConfig>) -> Result<Self> {
        if configs.is_empty() {
            return Err(anyhow!("scenario catalog must not be empty"));
        }
        let total_weight: f64 = configs.values().map(|cfg| cfg.weight).sum();
        if (total_weight - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(anyhow!(
                "scenario weights must sum to 1.0, got {}",
                total_weight
            ));
        }
        let scenarios = configs
            .iter()
            .map(|(name, cfg)| {
                let scenario = Arc::new(Scenario {
                    name: name.clone(),
                    weight: cfg.weight,
                    temp_drift_c: cfg.temp_drift_c,
                    malfunction_chance: cfg.malfunction_chance,
                });
                (name.clone(), scenario)
            })
            .collect();
        Ok(Self {
            scenarios,
            total_weight,
        })
    }

    /// Single weighted random selection with replacement.
    ///
    /// Deterministic given a seeded source; the cumulative walk visits
    /// scenarios in declaration order.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> &Arc<Scenario> {
        let roll = rng.gen::<f64>() * self.total_weight;
        let mut cumulative = 0.0;
        for scenario in self.scenarios.values() {
            cumulative += scenario.weight;
            if roll < cumulative {
                return scenario;
            }
        }
        // Floating point slack on the final boundary falls through to the
        // last declared scenario.
        self.scenarios
            .values()
            .last()
            .expect("catalog is non-empty")
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Scenario>> {
        self.scenarios.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coldtrace_common::AppConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn stock_catalog() -> ScenarioCatalog {
        ScenarioCatalog::from_config(&AppConfig::default().scenarios).unwrap()
    }

    #[test]
    fn get_by_name_and_unknown() {
        let catalog = stock_catalog();
        assert!(catalog.get("cooling_failure").is_some());
        assert!(catalog.get("meteor_strike").is_none());
    }

    #[test]
    fn draw_is_reproducible_under_fixed_seed() {
        let catalog = stock_catalog();
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..100 {
            assert_eq!(catalog.draw(&mut a).name, catalog.draw(&mut b).name);
        }
    }

    #[test]
    fn draw_frequency_tracks_configured_weights() {
        let catalog = stock_catalog();
        let mut rng = StdRng::seed_from_u64(0xC01D);
        let trials = 20_000usize;
        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..trials {
            *counts.entry(catalog.draw(&mut rng).name.clone()).or_default() += 1;
        }
        for name in catalog.names() {
            let expected = catalog.get(name).unwrap().weight;
            let observed = counts.get(name).copied().unwrap_or(0) as f64 / trials as f64;
            assert!(
                (observed - expected).abs() < 0.02,
                "{}: observed {} vs expected {}",
                name,
                observed,
                expected
            );
        }
    }

    #[test]
    fn rejects_unbalanced_weights() {
        let mut configs = AppConfig::default().scenarios;
        configs.get_mut("normal_operation").unwrap().weight = 0.9;
        assert!(ScenarioCatalog::from_config(&configs).is_err());
    }
}
