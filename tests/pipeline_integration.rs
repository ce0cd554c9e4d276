//! ---
//! cct_section: "15-testing-qa"
//! cct_subsection: "module"
//! cct_type: "source"
//! cct_scope: "code"
//! cct_description: "End-to-end pipeline integration suites."
//! cct_version: "v0.1.0"
//! cct_owner: "tbd"
//! ---
use std::sync::Arc;

use chrono::{TimeZone, Utc};

use coldtrace_alerting::AlertCategory;
use coldtrace_common::AppConfig;
use coldtrace_core::{Engine, Orchestrator};
use coldtrace_sim::Severity;

fn config(seed: u64) -> AppConfig {
    let mut config = AppConfig::default();
    config.simulation.seed = seed;
    config.simulation.epoch = Some(Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap());
    config
}

#[test]
fn a_day_of_ticks_flows_through_generation_classification_and_storage() {
    let engine = Engine::new(&config(0xDA7)).unwrap();
    // 96 ticks of 15 simulated minutes = one simulated day.
    for _ in 0..96 {
        engine.tick().unwrap();
    }

    for location in engine.list_locations() {
        let history = engine.history(&location.id, 24).unwrap();
        assert_eq!(history.len(), 96);
        assert!(history.windows(2).all(|w| w[0].timestamp < w[1].timestamp));

        // Every stored excursion has a matching alert in the same window.
        let excursions = history.iter().filter(|r| r.severity.is_excursion()).count();
        let alerts = engine.alerts(&location.id, 24).unwrap();
        let excursion_alerts = alerts
            .iter()
            .filter(|a| a.category == AlertCategory::Excursion)
            .count();
        assert_eq!(excursions, excursion_alerts);

        let latest = engine.current_reading(&location.id).unwrap();
        assert_eq!(latest.timestamp, history.last().unwrap().timestamp);
    }
}

#[test]
fn orchestrator_raises_system_events_alongside_readings() {
    let mut cfg = config(0x51C);
    cfg.simulation.system_event_chance = 1.0;
    let engine = Arc::new(Engine::new(&cfg).unwrap());
    let mut orchestrator = Orchestrator::new(engine.clone(), &cfg.simulation);
    for _ in 0..20 {
        orchestrator.tick_once().unwrap();
    }
    let system_alerts: usize = engine
        .list_locations()
        .iter()
        .map(|l| {
            engine
                .alerts(&l.id, 24)
                .unwrap()
                .iter()
                .filter(|a| a.category != AlertCategory::Excursion)
                .count()
        })
        .sum();
    assert_eq!(system_alerts, 20);
}

#[test]
fn injected_excursion_recovers_after_normal_ticks() {
    let engine = Engine::new(&config(0x4EC0)).unwrap();
    // Push the unit well out of range, then hold it under normal operation
    // and watch the smoothed reading return to the safe band.
    for _ in 0..8 {
        engine
            .inject_scenario("main_refrigerator", "power_outage")
            .unwrap();
    }
    let excursion = engine.current_reading("main_refrigerator").unwrap();
    assert!(excursion.severity.is_excursion());

    let mut recovered = false;
    for _ in 0..40 {
        let reading = engine
            .inject_scenario("main_refrigerator", "normal_operation")
            .unwrap();
        if reading.severity == Severity::Safe {
            recovered = true;
            break;
        }
    }
    assert!(recovered, "reading never returned to the safe band");
}

#[test]
fn compliance_window_excludes_older_readings() {
    let engine = Engine::new(&config(0x77)).unwrap();
    for _ in 0..96 {
        engine.tick().unwrap();
    }
    let full_day = engine.compliance_report("clinic_fridge", 24).unwrap();
    let last_hour = engine.compliance_report("clinic_fridge", 1).unwrap();
    assert_eq!(full_day.total_readings, 96);
    assert!(last_hour.total_readings < full_day.total_readings);
    assert!(last_hour.total_readings >= 4);
}
