//! Python bindings (feature `pyo3`)
//!
//! Thin wrapper: configuration arrives as a JSON string, hits leave as
//! lists of dicts. No simulation logic lives here.

pub mod engine;
pub mod types;
