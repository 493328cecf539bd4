//! PyO3 wrapper for ShowerEngine

use nalgebra::Vector3;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::types::{hits_to_py, metadata_to_py};
use crate::engine::{ShowerConfig, ShowerEngine as RustShowerEngine};
use crate::rng::RngManager;

/// Python wrapper for the shower library engine
///
/// The wrapper owns a seeded `RngManager`, so a given seed and call
/// sequence always produces the same hits.
///
/// # Example (from Python)
///
/// ```python
/// from hf_shower_core_rs import ShowerEngine
///
/// engine = ShowerEngine.new(open("hf_config.json").read(), seed=12345)
/// hits = engine.fill_hits((300.0, 0.0, 11150.0), (0.0, 0.0, 1.0), 11, 10_000.0)
/// print(f"{len(hits)} hits")
/// ```
#[pyclass(name = "ShowerEngine")]
pub struct PyShowerEngine {
    inner: RustShowerEngine,
    rng: RngManager,
}

#[pymethods]
impl PyShowerEngine {
    /// Build from a JSON configuration string
    ///
    /// Raises ValueError for a malformed configuration and RuntimeError
    /// when the library cannot be loaded.
    #[staticmethod]
    #[pyo3(signature = (config_json, seed=1))]
    fn new(config_json: &str, seed: u64) -> PyResult<Self> {
        let config = ShowerConfig::from_json_str(config_json)
            .map_err(|e| PyValueError::new_err(format!("Invalid configuration: {}", e)))?;
        let inner = RustShowerEngine::from_config(&config)
            .map_err(|e| PyRuntimeError::new_err(format!("Failed to create shower engine: {}", e)))?;
        Ok(Self {
            inner,
            rng: RngManager::new(seed),
        })
    }

    /// Hits for one incident particle
    ///
    /// Positions in mm, energy in MeV, times in ns. Returns a list of
    /// `{"x", "y", "z", "depth", "time"}` dicts, or `None` when the particle
    /// type is not covered by the library.
    #[pyo3(signature = (hit_point, direction, pdg_code, energy, weight=1.0, t_slice=0.0, only_long=false))]
    #[allow(clippy::too_many_arguments)]
    fn fill_hits<'py>(
        &mut self,
        py: Python<'py>,
        hit_point: (f64, f64, f64),
        direction: (f64, f64, f64),
        pdg_code: i32,
        energy: f64,
        weight: f64,
        t_slice: f64,
        only_long: bool,
    ) -> PyResult<Option<Bound<'py, PyList>>> {
        let outcome = self.inner.fill_hits(
            Vector3::new(hit_point.0, hit_point.1, hit_point.2),
            &Vector3::new(direction.0, direction.1, direction.2),
            pdg_code,
            energy,
            weight,
            t_slice,
            only_long,
            &mut self.rng,
        );
        if !outcome.handled {
            return Ok(None);
        }
        hits_to_py(py, &outcome.hits).map(Some)
    }

    /// Library metadata as a dict
    fn metadata<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        metadata_to_py(py, self.inner.metadata())
    }

    fn fingerprint(&self) -> String {
        self.inner.fingerprint().to_string()
    }

    /// Current RNG state, for checkpointing
    fn rng_state(&self) -> u64 {
        self.rng.get_state()
    }
}
