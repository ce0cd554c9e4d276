//! ---
//! cct_section: "01-core-functionality"
//! cct_subsection: "binary"
//! cct_type: "source"
//! cct_scope: "code"
//! cct_description: "Binary entrypoint for the ColdTrace daemon."
//! cct_version: "v0.1.0"
//! cct_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use coldtrace_common::config::AppConfig;
use coldtrace_common::logging::init_tracing;
use coldtrace_core::{Engine, EngineError, Orchestrator};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "ColdTrace daemon",
    long_about = None
)]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(long, help = "Override the simulation seed")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Run the simulation loop until interrupted")]
    Run,
    #[command(about = "Advance a fixed number of ticks and print a compliance summary")]
    Simulate {
        #[arg(long, default_value_t = 96, help = "Number of ticks to advance")]
        ticks: u32,
        #[arg(long, default_value_t = 24, help = "Compliance window in simulated hours")]
        report_hours: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("configs/coldtrace.toml"));
    candidates.push(PathBuf::from("configs/coldtrace.dev.toml"));

    let loaded = AppConfig::load_with_source(&candidates)?;
    let mut config = loaded.config;
    if let Some(seed) = cli.seed {
        config.simulation.seed = seed;
    }
    init_tracing("coldtraced", &config.logging)?;
    match &loaded.source {
        Some(path) => info!(config_path = %path.display(), "configuration loaded"),
        None => info!("no configuration file found; using the built-in fleet"),
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_daemon(config).await,
        Commands::Simulate {
            ticks,
            report_hours,
        } => simulate(config, ticks, report_hours),
    }
}

async fn run_daemon(config: AppConfig) -> Result<()> {
    let engine = Arc::new(Engine::new(&config)?);
    let orchestrator = Orchestrator::new(engine.clone(), &config.simulation);
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let handle = orchestrator.spawn(shutdown_rx);

    info!(
        locations = engine.list_locations().len(),
        "daemon running; waiting for termination signal"
    );
    signal::ctrl_c().await?;
    info!("ctrl-c received; shutting down");
    let _ = shutdown_tx.send(());
    handle.await??;

    Ok(())
}

fn simulate(config: AppConfig, ticks: u32, report_hours: i64) -> Result<()> {
    let engine = Engine::new(&config)?;
    for _ in 0..ticks {
        engine.tick()?;
    }

    let summary = engine.fleet_summary();
    println!(
        "Fleet: {}/{} locations reporting, health {:?} ({:.1})",
        summary.reporting, summary.total_locations, summary.health, summary.health_score
    );
    for location in engine.list_locations() {
        match engine.compliance_report(&location.id, report_hours) {
            Ok(report) => println!(
                "{:<20} {:>5} readings  compliance {:>6.2}%  excursions {:>3}  avg {:>5.1}°C",
                location.id,
                report.total_readings,
                report.compliance_rate * 100.0,
                report.excursion_count,
                report.avg_temp_c
            ),
            Err(EngineError::NoData { .. }) => {
                println!("{:<20} no readings in window", location.id);
            }
            Err(err) => {
                warn!(location = %location.id, error = %err, "compliance report failed");
            }
        }
    }
    Ok(())
}
