//! Record lookup over a loaded library
//!
//! # Entry positions
//!
//! Records are addressed by a 1-based index in `[1, total_events]`. Where a
//! record physically sits in its collection depends on the library
//! generation: older files keep electromagnetic and hadronic showers in one
//! shared index space, so hadronic records are offset by `total_events`.
//!
//! | layout  | encoding   | file version | hadronic position       |
//! |---------|------------|--------------|-------------------------|
//! | legacy  | any        | any          | `index − 1`             |
//! | compact | structured | ≥ 2          | `index − 1`             |
//! | compact | structured | < 2          | `index − 1 + total`     |
//! | compact | flat       | any          | `index − 1 + total`     |
//!
//! Electromagnetic records always sit at `index − 1`.

use super::format::{LibraryDocument, LibraryLayout, RecordEncoding};
use super::metadata::LibraryMetadata;
use super::LibraryError;
use crate::core::fingerprint::compute_fingerprint;
use crate::models::{PhotonSample, ShowerType};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Collection names and file version used to interpret a library document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOptions {
    pub em_collection: String,
    pub had_collection: String,
    pub file_version: i32,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            em_collection: "emParticles".to_string(),
            had_collection: "hadParticles".to_string(),
            file_version: 0,
        }
    }
}

#[derive(Debug, Clone)]
struct Collection {
    name: String,
    encoding: RecordEncoding,
    entries: Vec<Vec<PhotonSample>>,
}

impl Collection {
    fn photon_count(&self) -> usize {
        self.entries.iter().map(Vec::len).sum()
    }
}

#[derive(Serialize)]
struct CollectionSummary<'a> {
    name: &'a str,
    encoding: RecordEncoding,
    entries: usize,
    photons: usize,
}

impl<'a> From<&'a Collection> for CollectionSummary<'a> {
    fn from(collection: &'a Collection) -> Self {
        Self {
            name: &collection.name,
            encoding: collection.encoding,
            entries: collection.entries.len(),
            photons: collection.photon_count(),
        }
    }
}

#[derive(Serialize)]
struct StoreSummary<'a> {
    layout: LibraryLayout,
    metadata: &'a LibraryMetadata,
    em: CollectionSummary<'a>,
    had: CollectionSummary<'a>,
}

/// Loaded, normalised and immutable shower library
///
/// # Example
/// ```
/// use hf_shower_core_rs::library::{ShowerLibraryStore, StoreOptions};
/// use hf_shower_core_rs::models::ShowerType;
///
/// let json = r#"{
///     "layout": "compact",
///     "collections": {
///         "emParticles": {"encoding": "structured", "entries": [[{"x":0,"y":0,"z":5,"lambda":420,"t":1}]]},
///         "hadParticles": {"encoding": "structured", "entries": []}
///     }
/// }"#;
/// let store = ShowerLibraryStore::from_json_str(json, &StoreOptions::default()).unwrap();
/// assert_eq!(store.metadata().momentum_bins, 16);
/// assert_eq!(store.record(ShowerType::Electromagnetic, 1).len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ShowerLibraryStore {
    metadata: LibraryMetadata,
    layout: LibraryLayout,
    em: Collection,
    had: Collection,
    fingerprint: String,
}

impl ShowerLibraryStore {
    /// Read and normalise the library at `path`
    ///
    /// The file is read completely and closed before this returns, on the
    /// success path and on every error path.
    pub fn open(path: impl AsRef<Path>, options: &StoreOptions) -> Result<Self, LibraryError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| {
            tracing::error!(path = %path.display(), "opening shower library failed");
            LibraryError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        tracing::info!(path = %path.display(), "opened shower library");
        Self::from_reader(BufReader::new(file), options)
    }

    pub fn from_reader<R: Read>(reader: R, options: &StoreOptions) -> Result<Self, LibraryError> {
        let document: LibraryDocument = serde_json::from_reader(reader)?;
        Self::from_document(document, options)
    }

    pub fn from_json_str(json: &str, options: &StoreOptions) -> Result<Self, LibraryError> {
        let document: LibraryDocument = serde_json::from_str(json)?;
        Self::from_document(document, options)
    }

    /// Resolve metadata and normalise both collections
    ///
    /// # Errors
    /// - `EventInfoAbsent` for a legacy document without event information
    /// - `InvalidMetadata` for inconsistent event information
    /// - `MissingCollection` when either named collection is absent
    pub fn from_document(mut document: LibraryDocument, options: &StoreOptions) -> Result<Self, LibraryError> {
        if document.layout == LibraryLayout::Legacy && document.event_info.is_none() {
            tracing::error!("event information branch does not exist in legacy library");
            return Err(LibraryError::EventInfoAbsent);
        }
        let metadata = LibraryMetadata::load(document.event_info.as_ref(), options.file_version)?;
        metadata.log_summary();

        let em = take_collection(&mut document, &options.em_collection)?;
        let had = take_collection(&mut document, &options.had_collection)?;

        let mut store = Self {
            metadata,
            layout: document.layout,
            em,
            had,
            fingerprint: String::new(),
        };
        store.fingerprint = compute_fingerprint(&store.summary())?;

        tracing::info!(
            em_collection = %store.em.name,
            em_entries = store.em.entries.len(),
            had_collection = %store.had.name,
            had_entries = store.had.entries.len(),
            fingerprint = %store.fingerprint,
            "shower library loaded"
        );
        Ok(store)
    }

    pub fn metadata(&self) -> &LibraryMetadata {
        &self.metadata
    }

    pub fn layout(&self) -> LibraryLayout {
        self.layout
    }

    /// SHA-256 over metadata and collection sizes
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn encoding(&self, shower_type: ShowerType) -> RecordEncoding {
        self.collection(shower_type).encoding
    }

    /// Number of stored entries in the collection for `shower_type`
    pub fn entries(&self, shower_type: ShowerType) -> usize {
        self.collection(shower_type).entries.len()
    }

    /// Position inside the collection of the 1-based record `index`
    ///
    /// `None` for the sentinel index 0.
    pub fn entry_position(&self, shower_type: ShowerType, index: usize) -> Option<usize> {
        let nrc = index.checked_sub(1)?;
        let offset = match shower_type {
            ShowerType::Electromagnetic => 0,
            ShowerType::Hadronic => match (self.layout, self.had.encoding) {
                (LibraryLayout::Legacy, _) => 0,
                (LibraryLayout::Compact, RecordEncoding::Structured) if self.metadata.file_version >= 2 => 0,
                (LibraryLayout::Compact, _) => self.metadata.total_events,
            },
        };
        Some(nrc + offset)
    }

    /// Photons of record `index` (1-based)
    ///
    /// Out-of-range positions yield an empty record and a warning; the query
    /// path never fails.
    pub fn record(&self, shower_type: ShowerType, index: usize) -> &[PhotonSample] {
        let collection = self.collection(shower_type);
        let record = self
            .entry_position(shower_type, index)
            .and_then(|position| collection.entries.get(position));

        match record {
            Some(photons) => {
                tracing::trace!(
                    record = index,
                    ?shower_type,
                    photons = photons.len(),
                    "fetched library record"
                );
                photons.as_slice()
            }
            None => {
                tracing::warn!(
                    record = index,
                    ?shower_type,
                    collection = %collection.name,
                    entries = collection.entries.len(),
                    "library record not present; treating as empty"
                );
                &[]
            }
        }
    }

    fn collection(&self, shower_type: ShowerType) -> &Collection {
        match shower_type {
            ShowerType::Electromagnetic => &self.em,
            ShowerType::Hadronic => &self.had,
        }
    }

    fn summary(&self) -> StoreSummary<'_> {
        StoreSummary {
            layout: self.layout,
            metadata: &self.metadata,
            em: (&self.em).into(),
            had: (&self.had).into(),
        }
    }
}

fn take_collection(document: &mut LibraryDocument, name: &str) -> Result<Collection, LibraryError> {
    let raw = document.collections.remove(name).ok_or_else(|| {
        tracing::error!(collection = name, "record collection absent from shower library");
        LibraryError::MissingCollection(name.to_string())
    })?;
    Ok(Collection {
        name: name.to_string(),
        encoding: raw.encoding(),
        entries: raw.into_samples(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::format::{EventInfoRecord, RecordCollection};
    use std::collections::BTreeMap;

    fn photon(tag: f64) -> PhotonSample {
        PhotonSample::new(tag, 0.0, 10.0, 450.0, 0.0)
    }

    fn document(layout: LibraryLayout, had: RecordCollection) -> LibraryDocument {
        let mut collections = BTreeMap::new();
        collections.insert(
            "emParticles".to_string(),
            RecordCollection::Structured(vec![vec![photon(1.0)], vec![photon(2.0)]]),
        );
        collections.insert("hadParticles".to_string(), had);
        LibraryDocument {
            layout,
            event_info: Some(EventInfoRecord {
                total_events: 2,
                number_of_bins: 2,
                events_per_bin: 1,
                shower_library_version: 3.0,
                phys_list_version: 3.6,
                energy_bins: vec![10.0, 100.0],
            }),
            collections,
        }
    }

    fn options(file_version: i32) -> StoreOptions {
        StoreOptions {
            file_version,
            ..StoreOptions::default()
        }
    }

    #[test]
    fn test_legacy_hadronic_not_offset() {
        let had = RecordCollection::Structured(vec![vec![photon(10.0)], vec![photon(20.0)]]);
        let store = ShowerLibraryStore::from_document(document(LibraryLayout::Legacy, had), &options(0)).unwrap();
        assert_eq!(store.entry_position(ShowerType::Hadronic, 2), Some(1));
        assert_eq!(store.record(ShowerType::Hadronic, 2)[0].x, 20.0);
    }

    #[test]
    fn test_compact_old_file_offsets_hadronic() {
        let had = RecordCollection::Structured(vec![
            vec![photon(1.0)],
            vec![photon(2.0)],
            vec![photon(30.0)],
            vec![photon(40.0)],
        ]);
        let store = ShowerLibraryStore::from_document(document(LibraryLayout::Compact, had), &options(1)).unwrap();
        assert_eq!(store.entry_position(ShowerType::Hadronic, 1), Some(2));
        assert_eq!(store.record(ShowerType::Hadronic, 1)[0].x, 30.0);
        assert_eq!(store.record(ShowerType::Electromagnetic, 1)[0].x, 1.0);
    }

    #[test]
    fn test_compact_structured_v2_not_offset() {
        let had = RecordCollection::Structured(vec![vec![photon(10.0)], vec![photon(20.0)]]);
        let store = ShowerLibraryStore::from_document(document(LibraryLayout::Compact, had), &options(2)).unwrap();
        assert_eq!(store.entry_position(ShowerType::Hadronic, 1), Some(0));
    }

    #[test]
    fn test_compact_flat_always_offset() {
        let had = RecordCollection::Flat(vec![vec![], vec![], vec![7.0, 0.0, 1.0, 400.0, 0.0]]);
        let store = ShowerLibraryStore::from_document(document(LibraryLayout::Compact, had), &options(3)).unwrap();
        assert_eq!(store.entry_position(ShowerType::Hadronic, 1), Some(2));
        assert_eq!(store.record(ShowerType::Hadronic, 1)[0].x, 7.0);
    }

    #[test]
    fn test_sentinel_and_out_of_range_are_empty() {
        let had = RecordCollection::Structured(vec![]);
        let store = ShowerLibraryStore::from_document(document(LibraryLayout::Legacy, had), &options(0)).unwrap();
        assert_eq!(store.entry_position(ShowerType::Electromagnetic, 0), None);
        assert!(store.record(ShowerType::Electromagnetic, 0).is_empty());
        assert!(store.record(ShowerType::Hadronic, 1).is_empty());
        assert!(store.record(ShowerType::Electromagnetic, 99).is_empty());
    }

    #[test]
    fn test_fingerprint_stable_for_same_document() {
        let had = RecordCollection::Structured(vec![vec![photon(10.0)]]);
        let a = ShowerLibraryStore::from_document(document(LibraryLayout::Legacy, had.clone()), &options(0)).unwrap();
        let b = ShowerLibraryStore::from_document(document(LibraryLayout::Legacy, had), &options(0)).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }
}
