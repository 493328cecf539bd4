//! Domain models for the shower library engine

pub mod hit;
pub mod particle;
pub mod photon;
pub mod step;

// Re-exports
pub use hit::{Depth, Hit};
pub use particle::ShowerType;
pub use photon::{PhotonBuffer, PhotonSample};
pub use step::IncidentStep;
