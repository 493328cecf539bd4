//! CLI commands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// HF shower library driver
#[derive(Parser)]
#[command(name = "hf-shower")]
#[command(about = "Generate forward calorimeter hits from a shower library")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print library metadata, fingerprint and configuration hash
    Info {
        /// Engine configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Generate hits for a list of incident particles
    Shower {
        /// Engine configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,
        /// JSON array of incident steps
        #[arg(short, long)]
        particles: PathBuf,
        /// RNG seed
        #[arg(short, long, default_value = "12345")]
        seed: u64,
        /// Step weight applied to the acceptance probability
        #[arg(short, long, default_value = "1.0")]
        weight: f64,
        /// Long fibres only, with a second chance for short-fibre photons
        #[arg(long)]
        only_long: bool,
    },
}
