//! Record Selector
//!
//! Reproduces a shower at an arbitrary energy from a library recorded at
//! fixed energies.
//!
//! # Interpolation (`p < top edge`)
//!
//! With `edge[j] ≤ p < edge[j+1]` and `w = (p − edge[j]) / (edge[j+1] − edge[j])`,
//! one record is drawn from bin `j` and one from bin `j+1`. Each photon of
//! the lower record is kept with probability `1 − w`, each photon of the upper
//! record with probability `w`. Below the first edge only bin 0 contributes,
//! with `w = p / edge[0]`; the lower index is the sentinel 0 and is never
//! fetched.
//!
//! # Extrapolation (`p ≥ top edge`)
//!
//! `p / top` whole showers are taken from the top bin, plus one more whose
//! photons are kept with probability equal to the fractional remainder.
//!
//! Photon admission is an independent coin flip per photon, so the number of
//! photons contributed per record is binomial, not an exact split.

use crate::library::{LibraryMetadata, ShowerLibraryStore};
use crate::models::{PhotonBuffer, ShowerType};
use crate::rng::UniformSource;

/// Which selection rule was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMethod {
    Interpolation,
    Extrapolation,
}

/// Record indices chosen for an interpolation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolationDraw {
    /// 1-based lower-bin record, or 0 when no lower record contributes
    pub lower: usize,
    /// 1-based upper-bin record
    pub upper: usize,
    /// Weight of the upper record
    pub weight: f64,
}

/// Record indices chosen for an extrapolation
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrapolationDraw {
    /// 1-based records from the top bin; all but the last are taken whole
    pub records: Vec<usize>,
    /// Admission probability for photons of the last record
    pub weight: f64,
}

/// What a selection call did
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSummary {
    pub method: SelectionMethod,
    /// Records fetched, in fetch order (the interpolation sentinel is omitted)
    pub records: Vec<usize>,
    pub weight: f64,
    /// Photons the fetched records held in total
    pub available: usize,
    /// Photons admitted to the buffer
    pub stored: usize,
}

/// Clamp a computed record index into `[min, total_events]`, warning on change
///
/// # Example
/// ```
/// use hf_shower_core_rs::sampling::clamp_record_index;
///
/// assert_eq!(clamp_record_index(-4, 0, 100, "lower"), 0);
/// assert_eq!(clamp_record_index(0, 1, 100, "upper"), 1);
/// assert_eq!(clamp_record_index(250, 1, 100, "upper"), 100);
/// assert_eq!(clamp_record_index(42, 1, 100, "upper"), 42);
/// ```
pub fn clamp_record_index(raw: i64, min: usize, total_events: usize, label: &str) -> usize {
    let min_i = min as i64;
    let max_i = total_events as i64;
    if raw < min_i {
        tracing::warn!(record = label, index = raw, "illegal record index, now set to {}", min);
        min
    } else if raw > max_i {
        tracing::warn!(record = label, index = raw, "illegal record index, now set to {}", total_events);
        total_events
    } else {
        raw as usize
    }
}

/// Most records one extrapolation may stack (10 PeV over a 1 TeV top edge)
///
/// Energies at or beyond the cap, and non-finite energies, take this many
/// whole records.
pub const MAX_EXTRAPOLATION_RECORDS: usize = 10_000;

/// `⌊events_per_bin · scale · r⌋` as a signed index offset
fn bin_offset(events_per_bin: usize, scale: f64, r: f64) -> i64 {
    (events_per_bin as f64 * scale * r) as i64
}

/// Choose the two records blended for an energy inside the table
///
/// Draw order: one draw for the upper record, then (inside the table) one
/// draw for the lower record.
pub fn interpolation_draw<R: UniformSource + ?Sized>(
    metadata: &LibraryMetadata,
    pin: f64,
    rng: &mut R,
) -> InterpolationDraw {
    let edges = &metadata.momentum_edges;
    let epb = metadata.events_per_bin;
    let total = metadata.total_events;

    let mut lower: i64 = 0;
    let mut upper: i64 = 0;
    let mut weight = 0.0;
    let r = rng.flat();

    if pin < edges[0] {
        weight = pin / edges[0];
        upper = bin_offset(epb, 1.0, r) + 1;
    } else if let Some(j) = (0..metadata.momentum_bins.saturating_sub(1))
        .find(|&j| pin >= edges[j] && pin < edges[j + 1])
    {
        weight = (pin - edges[j]) / (edges[j + 1] - edges[j]);
        // The last interior bin only uses the lower half of the top bin
        let scale = if j + 2 == metadata.momentum_bins { 0.5 } else { 1.0 };
        upper = bin_offset(epb, scale, r) + ((j + 1) * epb) as i64 + 1;

        let r = rng.flat();
        lower = bin_offset(epb, 1.0, r) + 1 + (j * epb) as i64;
        lower = clamp_record_index(lower, 0, total, "lower") as i64;
    }

    InterpolationDraw {
        lower: lower as usize,
        upper: clamp_record_index(upper, 1, total, "upper"),
        weight,
    }
}

/// Choose the top-bin records stacked for an energy above the table
///
/// # Example
/// ```
/// use hf_shower_core_rs::library::LibraryMetadata;
/// use hf_shower_core_rs::rng::FixedSource;
/// use hf_shower_core_rs::sampling::extrapolation_draw;
///
/// let meta = LibraryMetadata::hardwired(0);
/// // 2.5 TeV over a 1 TeV top edge: two whole showers plus half of a third
/// let draw = extrapolation_draw(&meta, 2.5e6, &mut FixedSource::new(0.0));
/// assert_eq!(draw.records.len(), 3);
/// assert!((draw.weight - 0.5).abs() < 1e-12);
/// ```
pub fn extrapolation_draw<R: UniformSource + ?Sized>(
    metadata: &LibraryMetadata,
    pin: f64,
    rng: &mut R,
) -> ExtrapolationDraw {
    let top = metadata.top_edge();
    let epb = metadata.events_per_bin;
    let ratio = pin / top;
    let (nrec, weight) = if ratio < (MAX_EXTRAPOLATION_RECORDS - 1) as f64 {
        let whole = ratio as usize;
        (whole.saturating_add(1), (pin - top * whole as f64) / top)
    } else {
        tracing::warn!(
            energy_gev = pin / crate::core::units::GEV,
            max_records = MAX_EXTRAPOLATION_RECORDS,
            "extrapolation capped; every record taken whole"
        );
        (MAX_EXTRAPOLATION_RECORDS, 1.0)
    };

    let base = ((metadata.momentum_bins - 1) * epb) as i64 + 1;
    let records = (0..nrec)
        .map(|ir| {
            let raw = bin_offset(epb, 0.5, rng.flat()) + base;
            clamp_record_index(raw, 1, metadata.total_events, &format!("extrapolation[{}]", ir))
        })
        .collect();

    ExtrapolationDraw { records, weight }
}

/// Fills a [`PhotonBuffer`] from one library
///
/// # Example
/// ```
/// use hf_shower_core_rs::library::{ShowerLibraryStore, StoreOptions};
/// use hf_shower_core_rs::models::{PhotonBuffer, ShowerType};
/// use hf_shower_core_rs::rng::RngManager;
/// use hf_shower_core_rs::sampling::{RecordSelector, SelectionMethod};
///
/// let json = r#"{"layout": "compact", "collections": {
///     "emParticles": {"encoding": "structured", "entries": []},
///     "hadParticles": {"encoding": "structured", "entries": []}}}"#;
/// let store = ShowerLibraryStore::from_json_str(json, &StoreOptions::default()).unwrap();
///
/// let selector = RecordSelector::new(&store);
/// let mut buffer = PhotonBuffer::new();
/// let summary = selector.select(ShowerType::Electromagnetic, 5000.0, &mut buffer, &mut RngManager::new(1));
/// assert_eq!(summary.method, SelectionMethod::Interpolation);
/// assert!(buffer.is_empty());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RecordSelector<'a> {
    store: &'a ShowerLibraryStore,
}

impl<'a> RecordSelector<'a> {
    pub fn new(store: &'a ShowerLibraryStore) -> Self {
        Self { store }
    }

    /// Interpolate below the top edge, extrapolate at or above it
    pub fn select<R: UniformSource + ?Sized>(
        &self,
        shower_type: ShowerType,
        pin: f64,
        buffer: &mut PhotonBuffer,
        rng: &mut R,
    ) -> SelectionSummary {
        if pin < self.store.metadata().top_edge() {
            self.interpolate(shower_type, pin, buffer, rng)
        } else {
            self.extrapolate(shower_type, pin, buffer, rng)
        }
    }

    pub fn interpolate<R: UniformSource + ?Sized>(
        &self,
        shower_type: ShowerType,
        pin: f64,
        buffer: &mut PhotonBuffer,
        rng: &mut R,
    ) -> SelectionSummary {
        let metadata = self.store.metadata();
        tracing::debug!(
            energy_gev = pin / crate::core::units::GEV,
            bins = metadata.momentum_bins,
            events_per_bin = metadata.events_per_bin,
            total_events = metadata.total_events,
            "interpolating"
        );

        let draw = interpolation_draw(metadata, pin, rng);
        tracing::debug!(
            lower = draw.lower,
            upper = draw.upper,
            lower_weight = 1.0 - draw.weight,
            upper_weight = draw.weight,
            "selected records"
        );

        buffer.clear();
        let mut available = 0;
        let mut records = Vec::with_capacity(2);
        for (slot, index) in [draw.lower, draw.upper].into_iter().enumerate() {
            if index == 0 {
                continue;
            }
            records.push(index);
            let photons = self.store.record(shower_type, index);
            available += photons.len();
            for photon in photons {
                let r = rng.flat();
                let keep = if slot == 0 { r > draw.weight } else { r < draw.weight };
                if keep {
                    buffer.store_photon(*photon);
                }
            }
        }

        if buffer.npe() > available {
            tracing::warn!(
                lower = draw.lower,
                upper = draw.upper,
                available,
                stored = buffer.npe(),
                "interpolation stored more photons than the records hold"
            );
        }

        SelectionSummary {
            method: SelectionMethod::Interpolation,
            records,
            weight: draw.weight,
            available,
            stored: buffer.npe(),
        }
    }

    pub fn extrapolate<R: UniformSource + ?Sized>(
        &self,
        shower_type: ShowerType,
        pin: f64,
        buffer: &mut PhotonBuffer,
        rng: &mut R,
    ) -> SelectionSummary {
        let metadata = self.store.metadata();
        let draw = extrapolation_draw(metadata, pin, rng);
        tracing::debug!(
            energy_gev = pin / crate::core::units::GEV,
            records = draw.records.len(),
            weight = draw.weight,
            "extrapolating"
        );

        buffer.clear();
        let mut available = 0;
        let last = draw.records.len().saturating_sub(1);
        for (ir, &index) in draw.records.iter().enumerate() {
            let photons = self.store.record(shower_type, index);
            available += photons.len();
            for photon in photons {
                let r = rng.flat();
                if ir != last || r < draw.weight {
                    buffer.store_photon(*photon);
                }
            }
        }

        if buffer.npe() > available || available == 0 {
            tracing::warn!(
                records = ?draw.records,
                available,
                stored = buffer.npe(),
                "extrapolation produced an unexpected photon count"
            );
        }

        SelectionSummary {
            method: SelectionMethod::Extrapolation,
            records: draw.records,
            weight: draw.weight,
            available,
            stored: buffer.npe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::units::GEV;
    use crate::rng::{FixedSource, SequenceSource};

    #[test]
    fn test_below_first_edge_uses_sentinel() {
        let meta = LibraryMetadata::hardwired(0);
        let draw = interpolation_draw(&meta, 1.0 * GEV, &mut FixedSource::new(0.3));
        assert_eq!(draw.lower, 0);
        assert_eq!(draw.upper, 1501);
        assert!((draw.weight - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_interior_bin_indices() {
        let meta = LibraryMetadata::hardwired(0);
        // 4 GeV sits in bin 1 ([3, 5) GeV), weight 0.5
        let mut rng = SequenceSource::new(vec![0.5, 0.25]);
        let draw = interpolation_draw(&meta, 4.0 * GEV, &mut rng);
        assert_eq!(draw.upper, 2 * 5000 + 2500 + 1);
        assert_eq!(draw.lower, 5000 + 1250 + 1);
        assert!((draw.weight - 0.5).abs() < 1e-12);
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn test_last_interior_bin_uses_half_range() {
        let meta = LibraryMetadata::hardwired(0);
        let draw = interpolation_draw(&meta, 750.0 * GEV, &mut FixedSource::just_below_one());
        assert!(draw.upper <= meta.total_events);
        assert!(draw.upper > 15 * 5000);
        assert!(draw.upper <= 15 * 5000 + 2500);
    }

    #[test]
    fn test_extrapolation_record_count() {
        let meta = LibraryMetadata::hardwired(1);
        let draw = extrapolation_draw(&meta, 1000.0 * GEV, &mut FixedSource::new(0.0));
        assert_eq!(draw.records, vec![150_001, 150_001]);
        assert_eq!(draw.weight, 0.0);
    }
}
