//! Hit synthesis
//!
//! Turns the photon buffer into detector hits. See `hits.rs`.

pub mod hits;

pub use hits::{HitSynthesizer, IncidentFrame, SynthesisSettings};
