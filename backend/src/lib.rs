//! HF Shower Library Core - Rust Engine
//!
//! Fast simulation of forward calorimeter showers by resampling photons from
//! a library of pre-simulated showers.
//!
//! # Architecture
//!
//! - **library**: Loaded shower records and their energy binning
//! - **sampling**: Record selection by interpolation or extrapolation
//! - **synthesis**: Photon placement, acceptance cuts and hit emission
//! - **fibre**: Fibre attenuation and light-path models
//! - **geometry**: Detector constants and frame helpers
//! - **engine**: Configuration and the per-step entry point
//! - **rng**: Injected uniform random sources
//!
//! # Critical Invariants
//!
//! 1. All randomness comes from the caller's `UniformSource`
//! 2. The library is immutable after load
//! 3. Per-step failures are return values, never panics or errors

// Module declarations
pub mod core;
pub mod engine;
pub mod fibre;
pub mod geometry;
pub mod library;
pub mod models;
pub mod rng;
pub mod sampling;
pub mod synthesis;

// Re-exports for convenience
pub use engine::{ConfigError, EngineError, ShowerConfig, ShowerEngine, ShowerOutcome};
pub use fibre::{FibreTransport, TabulatedFibre, TransparentFibre};
pub use library::{LibraryError, LibraryMetadata, ShowerLibraryStore, StoreOptions};
pub use models::{Depth, Hit, IncidentStep, PhotonBuffer, PhotonSample, ShowerType};
pub use rng::{RngManager, UniformSource};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn hf_shower_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::engine::PyShowerEngine>()?;
    Ok(())
}
