//! ---
//! cct_section: "07-alerting"
//! cct_subsection: "module"
//! cct_type: "source"
//! cct_scope: "code"
//! cct_description: "Severity classification and recommended actions."
//! cct_version: "v0.1.0"
//! cct_owner: "tbd"
//! ---
use crate::classifier::{AlertCategory, AlertLevel};

/// Fixed remediation playbook, looked up by (level, category).
pub fn recommended_actions(level: AlertLevel, category: AlertCategory) -> Vec<String> {
    let actions: &[&str] = match (level, category) {
        (AlertLevel::Critical, AlertCategory::Excursion) => &[
            "Check cooling system and compressor immediately",
            "Verify door seal and closure",
            "Move stock to backup storage if temperature does not recover",
            "Notify the responsible pharmacist and log the excursion",
        ],
        (AlertLevel::Warning, AlertCategory::Excursion) => &[
            "Monitor the unit closely over the next readings",
            "Check door seals and recent access",
            "Verify temperature sensor calibration",
        ],
        (_, AlertCategory::Maintenance) => {
            &["Schedule the maintenance check with a technician"]
        }
        (_, AlertCategory::Calibration) => {
            &["Perform a sensor calibration check against a reference probe"]
        }
        (_, AlertCategory::Battery) => &[
            "Replace or recharge the sensor battery",
            "Confirm readings resume at the normal cadence",
        ],
        (_, AlertCategory::Communication) => &[
            "Check the sensor uplink and gateway connectivity",
            "Review the gap in the reading history once restored",
        ],
        (_, AlertCategory::Excursion) => &["Continue normal monitoring"],
    };
    actions.iter().map(|s| (*s).to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_level_category_pair_has_actions() {
        let levels = [AlertLevel::Critical, AlertLevel::Warning, AlertLevel::Info];
        let categories = [
            AlertCategory::Excursion,
            AlertCategory::Maintenance,
            AlertCategory::Calibration,
            AlertCategory::Battery,
            AlertCategory::Communication,
        ];
        for level in levels {
            for category in categories {
                assert!(
                    !recommended_actions(level, category).is_empty(),
                    "{level}/{category} has no actions"
                );
            }
        }
    }

    #[test]
    fn critical_excursion_escalates_to_relocation() {
        let actions = recommended_actions(AlertLevel::Critical, AlertCategory::Excursion);
        assert!(actions.iter().any(|a| a.contains("backup storage")));
        assert!(actions.len() >= 3);
    }
}
