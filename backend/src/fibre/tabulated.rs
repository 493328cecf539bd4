//! Table-driven fibre model
//!
//! Attenuation is looked up in equal-width wavelength bins. Fibre lengths
//! depend on the eta ring the point falls in (found from its radius) and on
//! the depth: short fibres are `gpar[0]` longer than their tabulated value
//! because they start behind the front face.
//!
//! This is a reference model: the default tables are plausible values, not a
//! calibration.

use super::{FibreTransport, ShiftMode};
use crate::core::units::{CM, C_LIGHT};
use crate::engine::ConfigError;
use crate::geometry::perp;
use crate::models::Depth;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Fibre length used when a ring has no tabulated value (cm)
const DEFAULT_FIBRE_LENGTH_CM: f64 = 250.0;

/// Fibre tables as written in configuration (lengths in cm)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FibreConfig {
    /// Attenuation coefficients (1/cm), one per wavelength bin
    pub attenuation: Vec<f64>,
    /// Wavelength range covered by `attenuation` (nm)
    pub lambda_limits: [f64; 2],
    /// Ring boundaries in radius, ascending (cm)
    pub radius_bins: Vec<f64>,
    /// Long fibre length per ring (cm)
    pub long_fibre_lengths: Vec<f64>,
    /// Short fibre length per ring, excluding the `gpar[0]` offset (cm)
    pub short_fibre_lengths: Vec<f64>,
    /// Signal speed in the fibre as a fraction of c
    pub c_fibre: f64,
}

impl Default for FibreConfig {
    fn default() -> Self {
        Self {
            attenuation: vec![0.0400, 0.0120, 0.0045, 0.0030, 0.0025, 0.0035],
            lambda_limits: [300.0, 600.0],
            radius_bins: vec![
                12.5, 16.9, 20.1, 24.0, 28.6, 34.0, 40.6, 48.3, 57.6, 68.6, 81.6, 97.5, 116.5, 130.0,
            ],
            long_fibre_lengths: vec![227.9; 13],
            short_fibre_lengths: vec![205.9; 13],
            c_fibre: 0.5,
        }
    }
}

/// Fibre model built from [`FibreConfig`], internally in mm
///
/// # Example
/// ```
/// use hf_shower_core_rs::fibre::{FibreConfig, FibreTransport, ShiftMode, TabulatedFibre};
/// use hf_shower_core_rs::models::Depth;
/// use nalgebra::Vector3;
///
/// let gpar = [220.0, 1650.0, 0.0, 0.0, 11150.0, 5.0];
/// let fibre = TabulatedFibre::new(FibreConfig::default(), gpar).unwrap();
///
/// // Equalized path: from the point to the back face of the absorber
/// let z = fibre.z_shift(&Vector3::new(300.0, 0.0, 0.0), Depth::Long, ShiftMode::Equalized);
/// assert!((z - 825.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedFibre {
    attenuation: Vec<f64>,
    lambda_limits: [f64; 2],
    radius_bins: Vec<f64>,
    long_lengths: Vec<f64>,
    short_lengths: Vec<f64>,
    signal_speed: f64,
    gpar: [f64; 6],
}

impl TabulatedFibre {
    pub fn new(config: FibreConfig, gpar: [f64; 6]) -> Result<Self, ConfigError> {
        if config.attenuation.is_empty() {
            return Err(ConfigError::InvalidParameter(
                "fibre attenuation table is empty".to_string(),
            ));
        }
        if !(config.lambda_limits[1] > config.lambda_limits[0]) {
            return Err(ConfigError::InvalidParameter(format!(
                "fibre wavelength limits {:?} are not increasing",
                config.lambda_limits
            )));
        }
        if !(config.c_fibre > 0.0) {
            return Err(ConfigError::InvalidParameter(format!(
                "fibre signal speed fraction must be positive, got {}",
                config.c_fibre
            )));
        }

        tracing::debug!(
            attenuation_bins = config.attenuation.len(),
            rings = config.radius_bins.len(),
            c_fibre = config.c_fibre,
            "fibre tables loaded"
        );

        Ok(Self {
            attenuation: config.attenuation.iter().map(|a| a / CM).collect(),
            lambda_limits: config.lambda_limits,
            radius_bins: config.radius_bins.iter().map(|r| r * CM).collect(),
            long_lengths: config.long_fibre_lengths.iter().map(|l| l * CM).collect(),
            short_lengths: config.short_fibre_lengths.iter().map(|l| l * CM).collect(),
            signal_speed: C_LIGHT * config.c_fibre,
            gpar,
        })
    }

    /// Eta ring of a transverse radius; ring 0 is the outermost
    fn ring(&self, radius: f64) -> usize {
        let n = self.radius_bins.len();
        let mut ieta = 0;
        for i in (1..n).rev() {
            if radius < self.radius_bins[i] {
                ieta = n - i - 1;
            }
        }
        ieta
    }

    /// Full fibre length for `depth` at ring `ieta`
    fn fibre_length(&self, depth: Depth, ieta: usize) -> f64 {
        match depth {
            Depth::Short => self
                .short_lengths
                .get(ieta)
                .map(|l| l + self.gpar[0])
                .unwrap_or(DEFAULT_FIBRE_LENGTH_CM * CM),
            Depth::Long => self
                .long_lengths
                .get(ieta)
                .copied()
                .unwrap_or(DEFAULT_FIBRE_LENGTH_CM * CM),
        }
    }
}

impl FibreTransport for TabulatedFibre {
    fn attenuation_length(&self, wavelength: f64) -> f64 {
        let n = self.attenuation.len();
        let [lo, hi] = self.lambda_limits;
        let bin = (n as f64 * (wavelength - lo) / (hi - lo)) as i64;
        let bin = bin.clamp(0, n as i64 - 1) as usize;
        self.attenuation[bin]
    }

    fn z_shift(&self, point: &Vector3<f64>, depth: Depth, mode: ShiftMode) -> f64 {
        if mode == ShiftMode::Equalized {
            return 0.5 * self.gpar[1] - point.z;
        }

        let length = self.fibre_length(depth, self.ring(perp(point)));
        match mode {
            ShiftMode::AbsorberEnd => length - self.gpar[1],
            _ => length - (0.5 * self.gpar[1] + point.z),
        }
    }

    fn time_shift(&self, point: &Vector3<f64>, depth: Depth, mode: ShiftMode) -> f64 {
        self.z_shift(point, depth, mode) / self.signal_speed
    }
}
