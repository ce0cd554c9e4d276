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

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use coldtrace_common::config::LocationConfig;

/// A monitored storage unit and its physical characteristics.
///
/// Immutable after registry construction; generators hold a shared handle
/// rather than their own copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageLocation {
    pub id: String,
    pub name: String,
    pub site: String,
    pub capacity_vials: u32,
    /// Equilibrium temperature the cooling system holds the unit at.
    pub base_temp_c: f64,
    /// Inverse noise/failure multiplier in (0, 1].
    pub reliability: f64,
}

/// Static catalog of monitored storage units, read-only after startup.
#[derive(Debug, Clone)]
pub struct LocationRegistry {
    locations: IndexMap<String, Arc<StorageLocation>>,
}

impl LocationRegistry {
    pub fn from_config(configs: &IndexMap<String, LocationConfig>) -> Self {
        let locations = configs
            .iter()
            .map(|(id, cfg)| {
                let location = Arc::new(StorageLocation {
                    id: id.clone(),
                    name: cfg.name.clone(),
                    site: cfg.site.clone(),
                    capacity_vials: cfg.capacity_vials,
                    base_temp_c: cfg.base_temp_c,
                    reliability: cfg.reliability,
                });
                (id.clone(), location)
            })
            .collect();
        Self { locations }
    }

    pub fn get(&self, location_id: &str) -> Option<&Arc<StorageLocation>> {
        self.locations.get(location_id)
    }

    /// All locations in declaration order.
    pub fn list(&self) -> impl Iterator<Item = &Arc<StorageLocation>> {
        self.locations.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.locations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coldtrace_common::AppConfig;

    #[test]
    fn builds_stock_fleet_in_declaration_order() {
        let config = AppConfig::default();
        let registry = LocationRegistry::from_config(&config.locations);
        let ids: Vec<_> = registry.ids().collect();
        assert_eq!(
            ids,
            vec![
                "main_refrigerator",
                "backup_fridge",
                "transport_cooler",
                "clinic_fridge"
            ]
        );
    }

    #[test]
    fn unknown_id_yields_none() {
        let config = AppConfig::default();
        let registry = LocationRegistry::from_config(&config.locations);
        assert!(registry.get("walk_in_freezer").is_none());
        let main = registry.get("main_refrigerator").unwrap();
        assert_eq!(main.base_temp_c, 4.5);
        assert_eq!(main.capacity_vials, 500);
    }
}
