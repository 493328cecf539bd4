//! Per-step shower generation
//!
//! `ShowerEngine` classifies the incident particle, applies the energy
//! threshold, fills the photon buffer from the library and turns the buffer
//! into hits. The library and geometry are fixed at construction; the random
//! source is supplied by the caller on every step.

use crate::core::units::{GEV, MEV};
use crate::engine::config::{ConfigError, ShowerConfig};
use crate::fibre::{FibreTransport, TabulatedFibre};
use crate::library::{LibraryError, LibraryMetadata, ShowerLibraryStore};
use crate::models::{Hit, IncidentStep, PhotonBuffer, ShowerType};
use crate::rng::UniformSource;
use crate::sampling::RecordSelector;
use crate::synthesis::{HitSynthesizer, IncidentFrame};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Incident energies below this produce no hits
pub const ENERGY_THRESHOLD: f64 = 50.0 * MEV;

/// Construction errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Library(#[from] LibraryError),
}

/// Result of one step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowerOutcome {
    pub hits: Vec<Hit>,
    /// False when the particle type is not covered by the library and the
    /// caller should simulate it by other means
    pub handled: bool,
}

impl ShowerOutcome {
    fn unhandled() -> Self {
        Self {
            hits: Vec::new(),
            handled: false,
        }
    }

    fn empty() -> Self {
        Self {
            hits: Vec::new(),
            handled: true,
        }
    }
}

/// Shower library engine
///
/// One instance per worker. Hit generation takes `&mut self` because the
/// photon buffer is reused between steps.
///
/// # Example
/// ```no_run
/// use hf_shower_core_rs::engine::{ShowerConfig, ShowerEngine};
/// use hf_shower_core_rs::models::IncidentStep;
/// use hf_shower_core_rs::RngManager;
///
/// let config = ShowerConfig::from_path("hf_config.json").unwrap();
/// let mut engine = ShowerEngine::from_config(&config).unwrap();
/// let mut rng = RngManager::new(12345);
/// let step: IncidentStep = serde_json::from_str(r#"{
///     "hit_point": [300.0, 0.0, 11150.0], "momentum_direction": [0.0, 0.0, 1.0],
///     "pdg_code": 11, "kinetic_energy": 9999.5, "total_energy": 10000.0
/// }"#).unwrap();
/// let outcome = engine.get_hits(&step, 1.0, false, &mut rng);
/// println!("{} hits", outcome.hits.len());
/// ```
pub struct ShowerEngine {
    store: ShowerLibraryStore,
    synthesizer: HitSynthesizer,
    fibre: Box<dyn FibreTransport + Send + Sync>,
    buffer: PhotonBuffer,
    config_hash: String,
}

impl std::fmt::Debug for ShowerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShowerEngine")
            .field("fingerprint", &self.store.fingerprint())
            .field("config_hash", &self.config_hash)
            .field("synthesizer", &self.synthesizer)
            .field("buffered", &self.buffer.npe())
            .finish()
    }
}

impl ShowerEngine {
    /// Load the library named in the configuration and build the tabulated
    /// fibre model
    ///
    /// # Errors
    /// Any `ConfigError` from the configuration (including a missing
    /// `library.file_name`) or `LibraryError` from loading the file.
    pub fn from_config(config: &ShowerConfig) -> Result<Self, EngineError> {
        let path = config.library.file_name.as_ref().ok_or_else(|| {
            ConfigError::InvalidParameter("library.file_name is not set".to_string())
        })?;
        tracing::info!(file = %path.display(), "opening shower library");

        let store = ShowerLibraryStore::open(path, &config.store_options())?;
        let geometry = config.geometry_params()?;
        let fibre = TabulatedFibre::new(config.fibre.clone(), geometry.gpar)?;
        Self::with_parts(config, store, fibre)
    }

    /// Assemble from an already loaded store and any fibre model
    pub fn with_parts<F>(config: &ShowerConfig, store: ShowerLibraryStore, fibre: F) -> Result<Self, EngineError>
    where
        F: FibreTransport + Send + Sync + 'static,
    {
        config.validate()?;
        let geometry = config.geometry_params()?;
        let settings = config.synthesis_settings();
        let config_hash = config.config_hash()?;

        tracing::info!(
            prob_max = settings.prob_max,
            back_probability = settings.back_probability,
            equalize_time_shift = settings.equalize_time_shift,
            apply_fiducial_cut = settings.apply_fiducial_cut,
            "shower engine settings"
        );
        tracing::info!(
            r_min = geometry.r_min,
            r_max = geometry.r_max,
            dphi = geometry.dphi,
            gpar = ?geometry.gpar,
            "detector geometry"
        );
        if config.library.verbosity {
            store.metadata().log_summary();
            for shower_type in [ShowerType::Electromagnetic, ShowerType::Hadronic] {
                tracing::info!(
                    ?shower_type,
                    encoding = ?store.encoding(shower_type),
                    entries = store.entries(shower_type),
                    "library collection"
                );
            }
        }

        Ok(Self {
            store,
            synthesizer: HitSynthesizer::new(geometry, settings),
            fibre: Box::new(fibre),
            buffer: PhotonBuffer::new(),
            config_hash,
        })
    }

    pub fn metadata(&self) -> &LibraryMetadata {
        self.store.metadata()
    }

    pub fn store(&self) -> &ShowerLibraryStore {
        &self.store
    }

    pub fn synthesizer(&self) -> &HitSynthesizer {
        &self.synthesizer
    }

    /// Library content fingerprint
    pub fn fingerprint(&self) -> &str {
        self.store.fingerprint()
    }

    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    /// Photons resampled for the most recent step; empty when that step
    /// produced no selection
    pub fn photon_buffer(&self) -> &PhotonBuffer {
        &self.buffer
    }

    /// Hits for a tracking step
    ///
    /// Ions are looked up as α particles; baryons use their kinetic energy,
    /// everything else the total energy. The step's global time is the time
    /// slice added to every hit.
    pub fn get_hits<R>(&mut self, step: &IncidentStep, weight: f64, only_long: bool, rng: &mut R) -> ShowerOutcome
    where
        R: UniformSource + ?Sized,
    {
        self.fill_hits(
            step.hit_point,
            &step.momentum_direction,
            step.effective_pdg(),
            step.incident_energy(),
            weight,
            step.global_time,
            only_long,
            rng,
        )
    }

    /// Hits for an explicit particle
    ///
    /// Non-finite energies are handled and produce no hits.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_hits<R>(
        &mut self,
        hit_point: Vector3<f64>,
        direction: &Vector3<f64>,
        pdg_code: i32,
        energy: f64,
        weight: f64,
        t_slice: f64,
        only_long: bool,
        rng: &mut R,
    ) -> ShowerOutcome
    where
        R: UniformSource + ?Sized,
    {
        self.buffer.clear();
        let Some(shower_type) = ShowerType::from_pdg(pdg_code) else {
            tracing::debug!(pdg_code, "particle not covered by the shower library");
            return ShowerOutcome::unhandled();
        };

        if !energy.is_finite() {
            tracing::warn!(pdg_code, energy, "non-finite incident energy; no hits produced");
            return ShowerOutcome::empty();
        }
        if energy < ENERGY_THRESHOLD {
            tracing::debug!(pdg_code, energy_mev = energy / MEV, "below shower library threshold");
            return ShowerOutcome::empty();
        }

        let frame = IncidentFrame::new(hit_point, direction);
        tracing::debug!(
            pdg_code,
            ?shower_type,
            energy_gev = energy / GEV,
            x = hit_point.x,
            y = hit_point.y,
            z = hit_point.z,
            backward = frame.backward,
            "filling hits"
        );

        let summary = RecordSelector::new(&self.store).select(shower_type, energy, &mut self.buffer, rng);
        tracing::debug!(
            method = ?summary.method,
            records = ?summary.records,
            stored = summary.stored,
            "photon buffer filled"
        );

        let hits = self.synthesizer.synthesize(
            &self.buffer,
            &frame,
            weight,
            t_slice,
            only_long,
            self.fibre.as_ref(),
            rng,
        );
        ShowerOutcome { hits, handled: true }
    }
}
