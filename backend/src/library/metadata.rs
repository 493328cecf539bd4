//! Library metadata: energy binning and event counts
//!
//! The library is organised in momentum bins. Bin `j` (0-based) owns the
//! 1-based record indices `j·events_per_bin + 1 ..= (j+1)·events_per_bin`.
//! Bin edges are stored internally in MeV.

use super::format::EventInfoRecord;
use super::LibraryError;
use crate::core::units::GEV;
use serde::{Deserialize, Serialize};

/// Bin edges (GeV) of libraries written without event information
pub const HARDWIRED_ENERGY_BINS_GEV: [f64; 16] = [
    2.0, 3.0, 5.0, 7.0, 10.0, 15.0, 20.0, 30.0, 50.0, 75.0, 100.0, 150.0, 250.0, 350.0, 500.0, 1000.0,
];

/// Energy binning and bookkeeping for one loaded library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryMetadata {
    pub total_events: usize,
    pub momentum_bins: usize,
    pub events_per_bin: usize,
    /// Lower bin edges in MeV, strictly ascending
    pub momentum_edges: Vec<f64>,
    pub library_version: f64,
    pub list_version: f64,
    pub file_version: i32,
}

impl LibraryMetadata {
    /// Metadata from persisted event information, or the hardwired defaults
    ///
    /// # Errors
    /// `LibraryError::InvalidMetadata` when persisted values are inconsistent
    pub fn load(event_info: Option<&EventInfoRecord>, file_version: i32) -> Result<Self, LibraryError> {
        match event_info {
            Some(info) => Self::from_event_info(info, file_version),
            None => {
                tracing::info!("loading event info from hardwired numbers");
                Ok(Self::hardwired(file_version))
            }
        }
    }

    /// Persisted values are authoritative; only their consistency is checked
    pub fn from_event_info(info: &EventInfoRecord, file_version: i32) -> Result<Self, LibraryError> {
        let metadata = Self {
            total_events: info.total_events,
            momentum_bins: info.number_of_bins,
            events_per_bin: info.events_per_bin,
            momentum_edges: info.energy_bins.iter().map(|e| e * GEV).collect(),
            library_version: info.shower_library_version,
            list_version: info.phys_list_version,
            file_version,
        };
        metadata.validate()?;
        Ok(metadata)
    }

    /// 16 fixed bins; 5000 events per bin for file version 0, else 10000
    ///
    /// # Example
    /// ```
    /// use hf_shower_core_rs::library::LibraryMetadata;
    ///
    /// let meta = LibraryMetadata::hardwired(0);
    /// assert_eq!(meta.momentum_bins, 16);
    /// assert_eq!(meta.total_events, 80_000);
    /// assert_eq!(meta.momentum_edges[0], 2000.0); // 2 GeV in MeV
    /// ```
    pub fn hardwired(file_version: i32) -> Self {
        let momentum_bins = HARDWIRED_ENERGY_BINS_GEV.len();
        let events_per_bin = if file_version == 0 { 5000 } else { 10000 };
        Self {
            total_events: momentum_bins * events_per_bin,
            momentum_bins,
            events_per_bin,
            momentum_edges: HARDWIRED_ENERGY_BINS_GEV.iter().map(|e| e * GEV).collect(),
            library_version: if file_version == 0 { 1.1 } else { 1.2 },
            list_version: 3.6,
            file_version,
        }
    }

    pub fn validate(&self) -> Result<(), LibraryError> {
        if self.momentum_bins == 0 {
            return Err(LibraryError::InvalidMetadata("no momentum bins".to_string()));
        }
        if self.momentum_edges.len() != self.momentum_bins {
            return Err(LibraryError::InvalidMetadata(format!(
                "{} momentum bins declared but {} edges given",
                self.momentum_bins,
                self.momentum_edges.len()
            )));
        }
        if let Some(pair) = self.momentum_edges.windows(2).find(|w| !(w[0] < w[1])) {
            return Err(LibraryError::InvalidMetadata(format!(
                "momentum edges not strictly ascending at {} -> {}",
                pair[0], pair[1]
            )));
        }
        if !(self.momentum_edges[0] > 0.0) {
            return Err(LibraryError::InvalidMetadata(format!(
                "first momentum edge must be positive, got {}",
                self.momentum_edges[0]
            )));
        }
        if self.events_per_bin == 0 || self.total_events == 0 {
            return Err(LibraryError::InvalidMetadata(format!(
                "empty library: {} events, {} per bin",
                self.total_events, self.events_per_bin
            )));
        }
        Ok(())
    }

    /// Upper edge of the table; at or above it the selector extrapolates
    pub fn top_edge(&self) -> f64 {
        self.momentum_edges[self.momentum_bins - 1]
    }

    pub fn log_summary(&self) {
        let energies: Vec<String> = self
            .momentum_edges
            .iter()
            .map(|e| format!("{}", e / GEV))
            .collect();
        tracing::info!(
            library_version = self.library_version,
            list_version = self.list_version,
            file_version = self.file_version,
            total_events = self.total_events,
            events_per_bin = self.events_per_bin,
            "shower library energies (GeV) in {} bins: {}",
            self.momentum_bins,
            energies.join(" ")
        );
    }
}
