//! Photon samples and the photon buffer
//!
//! A [`PhotonSample`] is one photo-electron equivalent recorded in the
//! shower library. Its coordinates live in the library's local shower frame
//! (z along the incident direction), never in the detector frame.
//!
//! The [`PhotonBuffer`] is the working set the record selector assembles for
//! a single hit-generation call. It is cleared and refilled on every call and
//! must not be relied upon between calls.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One recorded photon: local position, wavelength (nm) and emission time (ns)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhotonSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Wavelength in nm
    pub lambda: f64,
    /// Emission time relative to the shower start (ns)
    pub t: f64,
}

impl PhotonSample {
    pub fn new(x: f64, y: f64, z: f64, lambda: f64, t: f64) -> Self {
        Self { x, y, z, lambda, t }
    }
}

impl fmt::Display for PhotonSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.3}, {:.3}, {:.3}) lambda {:.1} t {:.3}",
            self.x, self.y, self.z, self.lambda, self.t
        )
    }
}

/// Resampled photons for one hit-generation call, in selection order
///
/// # Example
/// ```
/// use hf_shower_core_rs::models::{PhotonBuffer, PhotonSample};
///
/// let mut buffer = PhotonBuffer::new();
/// buffer.store_photon(PhotonSample::new(0.0, 0.0, 10.0, 400.0, 1.0));
/// assert_eq!(buffer.npe(), 1);
///
/// buffer.clear();
/// assert!(buffer.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PhotonBuffer {
    photons: Vec<PhotonSample>,
}

impl PhotonBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every stored photon (capacity is kept for the next call)
    pub fn clear(&mut self) {
        self.photons.clear();
    }

    /// Append a photon; no deduplication
    pub fn store_photon(&mut self, photon: PhotonSample) {
        self.photons.push(photon);
    }

    /// Number of stored photo-electrons
    pub fn npe(&self) -> usize {
        self.photons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photons.is_empty()
    }

    pub fn photons(&self) -> &[PhotonSample] {
        &self.photons
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PhotonSample> {
        self.photons.iter()
    }
}

impl<'a> IntoIterator for &'a PhotonBuffer {
    type Item = &'a PhotonSample;
    type IntoIter = std::slice::Iter<'a, PhotonSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.photons.iter()
    }
}

impl FromIterator<PhotonSample> for PhotonBuffer {
    fn from_iter<I: IntoIterator<Item = PhotonSample>>(iter: I) -> Self {
        Self {
            photons: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_keeps_selection_order_and_duplicates() {
        let a = PhotonSample::new(1.0, 0.0, 0.0, 400.0, 0.0);
        let b = PhotonSample::new(2.0, 0.0, 0.0, 450.0, 0.0);

        let mut buffer = PhotonBuffer::new();
        buffer.store_photon(b);
        buffer.store_photon(a);
        buffer.store_photon(b);

        assert_eq!(buffer.npe(), 3);
        assert_eq!(buffer.photons(), &[b, a, b]);
    }

    #[test]
    fn test_photon_deserializes_from_named_fields() {
        let photon: PhotonSample =
            serde_json::from_str(r#"{"x":1.0,"y":2.0,"z":3.0,"lambda":420.0,"t":4.5}"#).unwrap();
        assert_eq!(photon, PhotonSample::new(1.0, 2.0, 3.0, 420.0, 4.5));
    }
}
