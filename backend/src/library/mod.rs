//! Shower library store
//!
//! Owns every pre-recorded shower of one library file together with its
//! energy-binning metadata. Everything is read and normalised once, at
//! construction; afterwards the store is immutable and can be shared freely
//! between readers.
//!
//! - **format**: persisted document layout and record encodings
//! - **metadata**: energy bins, event counts, versions
//! - **store**: record lookup by `(shower type, 1-based index)`

pub mod format;
pub mod metadata;
pub mod store;

use std::path::PathBuf;
use thiserror::Error;

pub use format::{EventInfoRecord, LibraryDocument, LibraryLayout, RecordCollection, RecordEncoding};
pub use metadata::LibraryMetadata;
pub use store::{ShowerLibraryStore, StoreOptions};

/// Fatal errors raised while loading a shower library
///
/// None of these are recovered internally: a library that fails to load
/// aborts engine construction.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Opening shower library {path} failed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed shower library: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Record collection '{0}' absent from shower library")]
    MissingCollection(String),

    #[error("Event information absent from legacy shower library")]
    EventInfoAbsent,

    #[error("Invalid library metadata: {0}")]
    InvalidMetadata(String),
}
