//! Persisted shower library format
//!
//! A library is one JSON document holding named record collections plus an
//! optional event-information block:
//!
//! ```json
//! {
//!   "layout": "compact",
//!   "event_info": null,
//!   "collections": {
//!     "emParticles":  { "encoding": "structured", "entries": [[{"x":0,"y":0,"z":5,"lambda":420,"t":1.2}]] },
//!     "hadParticles": { "encoding": "flat",       "entries": [[0.0, 0.0, 5.0, 420.0, 1.2]] }
//!   }
//! }
//! ```
//!
//! Each collection stores its records either as structured samples or as flat
//! `f32` arrays. Flat arrays are field-blocked: for `n` photons the array
//! holds all `x` values, then all `y`, `z`, `lambda` and `t` values.

use crate::models::PhotonSample;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of stored fields per photon in the flat encoding
pub const FLAT_FIELDS: usize = 5;

/// Which generation of the library tree the document comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryLayout {
    /// Original event tree; event information is mandatory
    Legacy,
    /// Newer simulated-hits tree; event information optional
    Compact,
}

/// Persisted event information, energies in GeV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInfoRecord {
    pub total_events: usize,
    pub number_of_bins: usize,
    pub events_per_bin: usize,
    pub shower_library_version: f64,
    pub phys_list_version: f64,
    pub energy_bins: Vec<f64>,
}

/// Records of one collection as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "encoding", content = "entries", rename_all = "snake_case")]
pub enum RecordCollection {
    Structured(Vec<Vec<PhotonSample>>),
    Flat(Vec<Vec<f32>>),
}

/// Encoding tag kept after the collection has been normalised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordEncoding {
    Structured,
    Flat,
}

impl RecordCollection {
    pub fn encoding(&self) -> RecordEncoding {
        match self {
            RecordCollection::Structured(_) => RecordEncoding::Structured,
            RecordCollection::Flat(_) => RecordEncoding::Flat,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RecordCollection::Structured(entries) => entries.len(),
            RecordCollection::Flat(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalise every entry into photon samples
    pub fn into_samples(self) -> Vec<Vec<PhotonSample>> {
        match self {
            RecordCollection::Structured(entries) => entries,
            RecordCollection::Flat(entries) => entries.iter().map(|e| decode_flat(e)).collect(),
        }
    }
}

/// Decode one field-blocked flat record
///
/// A trailing remainder that does not fill a whole photon is ignored.
///
/// # Example
/// ```
/// use hf_shower_core_rs::library::format::decode_flat;
///
/// // two photons: x = [1, 2], y = [3, 4], z = [5, 6], lambda = [400, 500], t = [7, 8]
/// let raw = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 400.0, 500.0, 7.0, 8.0];
/// let photons = decode_flat(&raw);
/// assert_eq!(photons.len(), 2);
/// assert_eq!(photons[1].y, 4.0);
/// assert_eq!(photons[1].lambda, 500.0);
/// ```
pub fn decode_flat(raw: &[f32]) -> Vec<PhotonSample> {
    let n = raw.len() / FLAT_FIELDS;
    if raw.len() % FLAT_FIELDS != 0 {
        tracing::warn!(
            values = raw.len(),
            photons = n,
            "flat shower record length is not a multiple of {}; trailing values ignored",
            FLAT_FIELDS
        );
    }

    (0..n)
        .map(|i| {
            PhotonSample::new(
                f64::from(raw[i]),
                f64::from(raw[n + i]),
                f64::from(raw[2 * n + i]),
                f64::from(raw[3 * n + i]),
                f64::from(raw[4 * n + i]),
            )
        })
        .collect()
}

/// A complete persisted library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryDocument {
    pub layout: LibraryLayout,

    #[serde(default)]
    pub event_info: Option<EventInfoRecord>,

    pub collections: BTreeMap<String, RecordCollection>,
}
