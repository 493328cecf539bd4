//! Fibre light transport
//!
//! The synthesizer asks the fibre model two questions about a photon that
//! has been placed in the detector: how strongly light of its wavelength is
//! attenuated, and how far (and therefore how long) it travels along the
//! fibre to the photomultiplier.
//!
//! - [`FibreTransport`]: the seam the synthesizer depends on
//! - [`TabulatedFibre`]: table-driven reference model
//! - [`TransparentFibre`]: no attenuation, no delay (calibration and tests)

mod tabulated;

pub use tabulated::{FibreConfig, TabulatedFibre};

use crate::models::Depth;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Where the fibre path length is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftMode {
    /// From the photon emission point to the end of the fibre (code 0)
    EmissionPoint,
    /// From the back face of the absorber to the end of the fibre (code +1)
    AbsorberEnd,
    /// Path inside the absorber only, equal for every eta ring (code −1)
    Equalized,
}

impl ShiftMode {
    pub fn code(self) -> i32 {
        match self {
            ShiftMode::EmissionPoint => 0,
            ShiftMode::AbsorberEnd => 1,
            ShiftMode::Equalized => -1,
        }
    }

    /// Mode used to time-stamp hits
    pub fn for_timing(equalize_time_shift: bool) -> Self {
        if equalize_time_shift {
            ShiftMode::Equalized
        } else {
            ShiftMode::AbsorberEnd
        }
    }
}

/// Optical model of the readout fibres
///
/// `point` is in the absorber-local frame: global x and y, and z measured
/// from the middle of the absorber (see `GeometryParams::local_z`).
pub trait FibreTransport {
    /// Attenuation coefficient (1/mm) for light of `wavelength` nm
    fn attenuation_length(&self, wavelength: f64) -> f64;

    /// Fibre path length (mm)
    fn z_shift(&self, point: &Vector3<f64>, depth: Depth, mode: ShiftMode) -> f64;

    /// Propagation delay (ns)
    fn time_shift(&self, point: &Vector3<f64>, depth: Depth, mode: ShiftMode) -> f64;
}

impl<T: FibreTransport + ?Sized> FibreTransport for Box<T> {
    fn attenuation_length(&self, wavelength: f64) -> f64 {
        (**self).attenuation_length(wavelength)
    }

    fn z_shift(&self, point: &Vector3<f64>, depth: Depth, mode: ShiftMode) -> f64 {
        (**self).z_shift(point, depth, mode)
    }

    fn time_shift(&self, point: &Vector3<f64>, depth: Depth, mode: ShiftMode) -> f64 {
        (**self).time_shift(point, depth, mode)
    }
}

/// Lossless, instantaneous fibre
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransparentFibre;

impl FibreTransport for TransparentFibre {
    fn attenuation_length(&self, _wavelength: f64) -> f64 {
        0.0
    }

    fn z_shift(&self, _point: &Vector3<f64>, _depth: Depth, _mode: ShiftMode) -> f64 {
        0.0
    }

    fn time_shift(&self, _point: &Vector3<f64>, _depth: Depth, _mode: ShiftMode) -> f64 {
        0.0
    }
}
