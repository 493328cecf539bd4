//! hf-shower: command-line driver for the shower library engine

mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Cli, Commands};
use hf_shower_core_rs::{IncidentStep, RngManager, ShowerConfig, ShowerEngine, ShowerOutcome};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct InfoReport<'a> {
    metadata: &'a hf_shower_core_rs::LibraryMetadata,
    fingerprint: &'a str,
    config_hash: &'a str,
}

#[derive(Serialize)]
struct StepReport {
    step: usize,
    #[serde(flatten)]
    outcome: ShowerOutcome,
}

fn load_engine(config_path: &Path) -> Result<ShowerEngine> {
    let config = ShowerConfig::from_path(config_path)
        .with_context(|| format!("loading configuration {}", config_path.display()))?;
    ShowerEngine::from_config(&config).context("building shower engine")
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info { config } => {
            let engine = load_engine(&config)?;
            let report = InfoReport {
                metadata: engine.metadata(),
                fingerprint: engine.fingerprint(),
                config_hash: engine.config_hash(),
            };
            serde_json::to_writer_pretty(std::io::stdout(), &report)?;
        }
        Commands::Shower {
            config,
            particles,
            seed,
            weight,
            only_long,
        } => {
            let mut engine = load_engine(&config)?;
            let text = std::fs::read_to_string(&particles)
                .with_context(|| format!("reading particles {}", particles.display()))?;
            let steps: Vec<IncidentStep> =
                serde_json::from_str(&text).with_context(|| format!("parsing particles {}", particles.display()))?;

            let mut rng = RngManager::new(seed);
            let reports: Vec<StepReport> = steps
                .iter()
                .enumerate()
                .map(|(step, incident)| StepReport {
                    step,
                    outcome: engine.get_hits(incident, weight, only_long, &mut rng),
                })
                .collect();

            let total: usize = reports.iter().map(|r| r.outcome.hits.len()).sum();
            tracing::info!(steps = reports.len(), hits = total, seed, "shower generation complete");
            serde_json::to_writer_pretty(std::io::stdout(), &reports)?;
        }
    }
    println!();
    Ok(())
}
