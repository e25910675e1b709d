//! Swarm Lab Binary
//!
//! Runs the configured experiment suites and writes a JSON report.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use swarm_lab::{run_suites, LabConfig, LAB_VERSION};

fn main() -> Result<()> {
    // Initialize tracing; the report owns stdout
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Swarm Lab v{}", LAB_VERSION);

    // Load configuration
    let config = LabConfig::load()?;
    info!(
        seed = config.base.seed,
        agents = config.base.population.total(),
        suites = ?config.suites,
        "Loaded configuration"
    );

    let report = run_suites(&config)?;

    let json = if config.output.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match &config.output.path {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
