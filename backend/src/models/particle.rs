//! Particle classification
//!
//! The library only holds showers for two families of incident particles:
//! electromagnetic (γ, e±) and stable hadrons (including light ions). Every
//! other particle is left to the caller's regular tracking.

use serde::{Deserialize, Serialize};

/// PDG code of the photon
pub const PDG_GAMMA: i32 = 22;
/// PDG code of the electron (positron is the negative)
pub const PDG_ELECTRON: i32 = 11;
/// PDG code used for every generic ion (α particle)
pub const PDG_ALPHA: i32 = 1000020040;

/// |PDG| codes treated as stable hadrons: π±, K±, K0L, p, n, d, t, ³He, α
const STABLE_HADRONS: [i32; 9] = [
    211, 321, 130, 2212, 2112, 1000010020, 1000010030, 1000020030, PDG_ALPHA,
];

/// Which library collection a shower is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShowerType {
    Electromagnetic,
    Hadronic,
}

impl ShowerType {
    /// Classify a PDG code; `None` when the library has no showers for it
    ///
    /// # Example
    /// ```
    /// use hf_shower_core_rs::models::ShowerType;
    ///
    /// assert_eq!(ShowerType::from_pdg(-11), Some(ShowerType::Electromagnetic));
    /// assert_eq!(ShowerType::from_pdg(2212), Some(ShowerType::Hadronic));
    /// assert_eq!(ShowerType::from_pdg(13), None);
    /// ```
    pub fn from_pdg(pdg_code: i32) -> Option<Self> {
        if is_gamma_electron_positron(pdg_code) {
            Some(ShowerType::Electromagnetic)
        } else if is_stable_hadron(pdg_code) {
            Some(ShowerType::Hadronic)
        } else {
            None
        }
    }
}

pub fn is_gamma_electron_positron(pdg_code: i32) -> bool {
    pdg_code == PDG_GAMMA || pdg_code.abs() == PDG_ELECTRON
}

pub fn is_stable_hadron(pdg_code: i32) -> bool {
    STABLE_HADRONS.contains(&pdg_code.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_antiparticles_classified_like_particles() {
        assert_eq!(ShowerType::from_pdg(-211), Some(ShowerType::Hadronic));
        assert_eq!(ShowerType::from_pdg(-2212), Some(ShowerType::Hadronic));
        assert_eq!(ShowerType::from_pdg(11), Some(ShowerType::Electromagnetic));
    }

    #[test]
    fn test_unsupported_particles() {
        for pdg in [13, -13, 12, 14, 111, 310, 3122, 0] {
            assert_eq!(ShowerType::from_pdg(pdg), None, "pdg {}", pdg);
        }
    }
}
