//! Conversions from engine types to Python objects

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::library::LibraryMetadata;
use crate::models::Hit;

/// `{"x", "y", "z", "depth", "time"}`
pub fn hit_to_py<'py>(py: Python<'py>, hit: &Hit) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("x", hit.position.x)?;
    dict.set_item("y", hit.position.y)?;
    dict.set_item("z", hit.position.z)?;
    dict.set_item("depth", hit.depth.number())?;
    dict.set_item("time", hit.time)?;
    Ok(dict)
}

pub fn hits_to_py<'py>(py: Python<'py>, hits: &[Hit]) -> PyResult<Bound<'py, PyList>> {
    let list = PyList::empty_bound(py);
    for hit in hits {
        list.append(hit_to_py(py, hit)?)?;
    }
    Ok(list)
}

/// Energies are reported in GeV
pub fn metadata_to_py<'py>(py: Python<'py>, metadata: &LibraryMetadata) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("total_events", metadata.total_events)?;
    dict.set_item("momentum_bins", metadata.momentum_bins)?;
    dict.set_item("events_per_bin", metadata.events_per_bin)?;
    let edges: Vec<f64> = metadata
        .momentum_edges
        .iter()
        .map(|e| e / crate::core::units::GEV)
        .collect();
    dict.set_item("energy_bins_gev", edges)?;
    dict.set_item("library_version", metadata.library_version)?;
    dict.set_item("list_version", metadata.list_version)?;
    dict.set_item("file_version", metadata.file_version)?;
    Ok(dict)
}
