//! Engine configuration
//!
//! One JSON document with four blocks:
//!
//! ```json
//! {
//!   "shower":   { "prob_max": 0.97, "equalize_time_shift": false },
//!   "library":  { "file_name": "hf_showers.json", "back_probability": 0.2,
//!                 "tree_em_id": "emParticles", "tree_had_id": "hadParticles",
//!                 "apply_fiducial_cut": true, "file_version": 0, "verbosity": false },
//!   "geometry": { "r_table": [125.0, 1300.0], "phi_table": [0.0873], "gpar": [220, 1650, 0, 0, 11150, 5] },
//!   "fibre":    { "c_fibre": 0.5 }
//! }
//! ```
//!
//! Every field has a default. Geometry values are in internal units (mm,
//! rad); fibre tables are in cm as documented on `FibreConfig`.

use crate::core::fingerprint::compute_fingerprint;
use crate::fibre::FibreConfig;
use crate::geometry::GeometryParams;
use crate::library::StoreOptions;
use crate::synthesis::SynthesisSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors, all fatal at construction
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Reading configuration {path} failed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Acceptance block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowerBlock {
    /// Maximum acceptance probability
    pub prob_max: f64,
    /// Time-stamp hits with the eta-equalized fibre path
    pub equalize_time_shift: bool,
}

impl Default for ShowerBlock {
    fn default() -> Self {
        Self {
            prob_max: 1.0,
            equalize_time_shift: false,
        }
    }
}

/// Library file block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryFileBlock {
    /// Library document; relative paths resolve against the config file
    pub file_name: Option<PathBuf>,
    /// Probability that light from a backward-going shower is seen
    pub back_probability: f64,
    pub tree_em_id: String,
    pub tree_had_id: String,
    pub apply_fiducial_cut: bool,
    pub file_version: i32,
    /// Log a detailed summary at construction
    pub verbosity: bool,
}

impl Default for LibraryFileBlock {
    fn default() -> Self {
        let store = StoreOptions::default();
        Self {
            file_name: None,
            back_probability: 0.2,
            tree_em_id: store.em_collection,
            tree_had_id: store.had_collection,
            apply_fiducial_cut: true,
            file_version: store.file_version,
            verbosity: false,
        }
    }
}

/// Detector tables (mm, rad)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub r_table: Vec<f64>,
    pub phi_table: Vec<f64>,
    pub gpar: Vec<f64>,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            r_table: vec![
                125.0, 169.0, 201.0, 240.0, 286.0, 340.0, 406.0, 483.0, 576.0, 686.0, 816.0, 975.0, 1165.0, 1300.0,
            ],
            phi_table: vec![5.0 * crate::core::units::DEG, 10.0 * crate::core::units::DEG],
            gpar: vec![220.0, 1650.0, 0.0, 0.0, 11150.0, 5.0],
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowerConfig {
    pub shower: ShowerBlock,
    pub library: LibraryFileBlock,
    pub geometry: GeometryConfig,
    pub fibre: FibreConfig,
}

impl ShowerConfig {
    /// Parse and validate
    ///
    /// # Example
    /// ```
    /// use hf_shower_core_rs::engine::ShowerConfig;
    ///
    /// let config = ShowerConfig::from_json_str(r#"{"shower": {"prob_max": 0.97}}"#).unwrap();
    /// assert_eq!(config.shower.prob_max, 0.97);
    /// assert_eq!(config.library.back_probability, 0.2);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ShowerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate; a relative `file_name` is resolved against
    /// the directory holding the configuration
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json_str(&text)?;

        if let (Some(file), Some(dir)) = (config.library.file_name.as_ref(), path.parent()) {
            if file.is_relative() {
                config.library.file_name = Some(dir.join(file));
            }
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.shower.prob_max >= 0.0) {
            return Err(ConfigError::InvalidParameter(format!(
                "prob_max must be non-negative, got {}",
                self.shower.prob_max
            )));
        }
        if !(0.0..=1.0).contains(&self.library.back_probability) {
            return Err(ConfigError::InvalidParameter(format!(
                "back_probability must lie in [0, 1], got {}",
                self.library.back_probability
            )));
        }
        self.geometry_params()?;
        Ok(())
    }

    pub fn geometry_params(&self) -> Result<GeometryParams, ConfigError> {
        GeometryParams::from_tables(&self.geometry.r_table, &self.geometry.phi_table, &self.geometry.gpar)
    }

    pub fn synthesis_settings(&self) -> SynthesisSettings {
        SynthesisSettings {
            prob_max: self.shower.prob_max,
            back_probability: self.library.back_probability,
            equalize_time_shift: self.shower.equalize_time_shift,
            apply_fiducial_cut: self.library.apply_fiducial_cut,
        }
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            em_collection: self.library.tree_em_id.clone(),
            had_collection: self.library.tree_had_id.clone(),
            file_version: self.library.file_version,
        }
    }

    /// SHA-256 of the canonical configuration
    pub fn config_hash(&self) -> Result<String, ConfigError> {
        Ok(compute_fingerprint(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ShowerConfig::default();
        config.validate().unwrap();
        let geometry = config.geometry_params().unwrap();
        assert_eq!(geometry.r_min, 125.0);
        assert_eq!(geometry.r_max, 1300.0);
    }

    #[test]
    fn test_rejects_bad_back_probability() {
        let err = ShowerConfig::from_json_str(r#"{"library": {"back_probability": 1.5}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter(_)));
    }

    #[test]
    fn test_rejects_short_gpar() {
        let err = ShowerConfig::from_json_str(r#"{"geometry": {"gpar": [1, 2, 3]}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGeometry(_)));
    }

    #[test]
    fn test_settings_mapping() {
        let config = ShowerConfig::from_json_str(
            r#"{"shower": {"prob_max": 0.5, "equalize_time_shift": true},
                "library": {"apply_fiducial_cut": false, "tree_em_id": "em", "file_version": 3}}"#,
        )
        .unwrap();
        let settings = config.synthesis_settings();
        assert_eq!(settings.prob_max, 0.5);
        assert!(settings.equalize_time_shift);
        assert!(!settings.apply_fiducial_cut);

        let store = config.store_options();
        assert_eq!(store.em_collection, "em");
        assert_eq!(store.had_collection, "hadParticles");
        assert_eq!(store.file_version, 3);
    }

    #[test]
    fn test_config_hash_changes_with_content() {
        let a = ShowerConfig::default();
        let mut b = ShowerConfig::default();
        b.shower.prob_max = 0.9;
        assert_ne!(a.config_hash().unwrap(), b.config_hash().unwrap());
        assert_eq!(a.config_hash().unwrap(), ShowerConfig::default().config_hash().unwrap());
    }
}
