//! ---
//! cct_section: "01-core-functionality"
//! cct_subsection: "module"
//! cct_type: "source"
//! cct_scope: "code"
//! cct_description: "Engine facade and tick orchestration."
//! cct_version: "v0.1.0"
//! cct_owner: "tbd"
//! ---
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use coldtrace_alerting::AlertLevel;
use coldtrace_common::config::SimulationConfig;

use crate::engine::Engine;
use crate::events::SystemEventScheduler;

/// Keeps the system-event stream decorrelated from the per-location streams
/// that share the configured seed.
const EVENT_SEED_SALT: u64 = 0x5EED_0E4E;

/// Drives the engine on a wall-clock pace and raises synthetic system events
/// on its own schedule. Readers of the engine are never blocked by ticking.
#[derive(Debug)]
pub struct Orchestrator {
    engine: Arc<Engine>,
    pace: Duration,
    scheduler: SystemEventScheduler,
    location_ids: Vec<String>,
}

impl Orchestrator {
    pub fn new(engine: Arc<Engine>, simulation: &SimulationConfig) -> Self {
        let scheduler = SystemEventScheduler::new(
            simulation.seed ^ EVENT_SEED_SALT,
            simulation.system_event_chance,
        );
        let location_ids = engine
            .list_locations()
            .into_iter()
            .map(|l| l.id)
            .collect();
        Self {
            engine,
            pace: simulation.pace,
            scheduler,
            location_ids,
        }
    }

    /// One orchestration step: advance the fleet, then roll for a system
    /// event.
    pub fn tick_once(&mut self) -> Result<()> {
        self.engine.tick()?;
        if let Some(event) = self.scheduler.poll(&self.location_ids) {
            match self.engine.record_system_event(
                &event.location_id,
                event.category,
                AlertLevel::Info,
                event.message,
            ) {
                Ok(alert) => {
                    info!(
                        location = %alert.location_id,
                        category = %alert.category,
                        "system event raised"
                    );
                }
                Err(err) => {
                    warn!(location = %event.location_id, error = %err, "failed to record system event");
                }
            }
        }
        Ok(())
    }

    /// Tick until the shutdown broadcast fires.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        let mut interval = tokio::time::interval(self.pace);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(pace_ms = self.pace.as_millis() as u64, "orchestrator running");
        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("orchestrator shutdown signal received");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(err) = self.tick_once() {
                        error!(error = %err, "tick failed");
                    } else {
                        let summary = self.engine.fleet_summary();
                        info!(
                            sim_time = %summary.last_updated,
                            active_alerts = summary.active_alerts,
                            health_score = summary.health_score,
                            "fleet tick"
                        );
                    }
                }
            }
        }
        info!("orchestrator stopped");
        Ok(())
    }

    /// Spawn the run loop on the current tokio runtime.
    pub fn spawn(self, shutdown: broadcast::Receiver<()>) -> JoinHandle<Result<()>> {
        tokio::spawn(self.run(shutdown))
    }
}
