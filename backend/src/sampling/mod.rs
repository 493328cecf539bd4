//! Record selection by energy
//!
//! Picks library records for an incident energy and fills the photon buffer.
//! See `selector.rs` for the interpolation and extrapolation rules.

pub mod selector;

pub use selector::{
    clamp_record_index, extrapolation_draw, interpolation_draw, ExtrapolationDraw, InterpolationDraw,
    RecordSelector, SelectionMethod, SelectionSummary, MAX_EXTRAPOLATION_RECORDS,
};
