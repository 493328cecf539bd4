//! Shower engine - the entry point used by the simulation
//!
//! Wires the library store, record selector, hit synthesizer and fibre model
//! together behind one call per incident step.
//!
//! See `shower.rs` for the per-step flow and `config.rs` for configuration.

pub mod config;
pub mod shower;

pub use config::{ConfigError, GeometryConfig, LibraryFileBlock, ShowerBlock, ShowerConfig};
pub use shower::{EngineError, ShowerEngine, ShowerOutcome, ENERGY_THRESHOLD};
