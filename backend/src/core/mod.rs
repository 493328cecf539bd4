//! Core definitions shared by every component
//!
//! - **units**: internal unit system (MeV, mm, ns) and conversion constants
//! - **fingerprint**: canonical SHA-256 digests for provenance

pub mod fingerprint;
pub mod units;
