//! Incident step summary
//!
//! The part of a tracking step the engine needs: where the particle enters,
//! where it is heading, what it is and how much energy it carries.

use crate::models::particle::PDG_ALPHA;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Incident particle at the calorimeter boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentStep {
    /// Global entry point (mm)
    pub hit_point: Vector3<f64>,

    /// Unit momentum direction
    pub momentum_direction: Vector3<f64>,

    /// PDG code of the particle
    pub pdg_code: i32,

    /// Generic ion (any nucleus not tracked under its own PDG code)
    #[serde(default)]
    pub is_ion: bool,

    /// Baryon number (protons, neutrons and ions have > 0)
    #[serde(default)]
    pub baryon_number: i32,

    /// Kinetic energy at the entry point (MeV)
    pub kinetic_energy: f64,

    /// Total energy at the entry point (MeV)
    pub total_energy: f64,

    /// Global time at the end of the step (ns)
    #[serde(default)]
    pub global_time: f64,
}

impl IncidentStep {
    /// PDG code used for library lookup; ions are treated as α
    pub fn effective_pdg(&self) -> i32 {
        if self.is_ion {
            PDG_ALPHA
        } else {
            self.pdg_code
        }
    }

    /// Energy used to pick library bins: kinetic for baryons, total otherwise
    ///
    /// # Example
    /// ```
    /// use hf_shower_core_rs::models::IncidentStep;
    /// use nalgebra::Vector3;
    ///
    /// let proton = IncidentStep {
    ///     hit_point: Vector3::zeros(),
    ///     momentum_direction: Vector3::z(),
    ///     pdg_code: 2212,
    ///     is_ion: false,
    ///     baryon_number: 1,
    ///     kinetic_energy: 9000.0,
    ///     total_energy: 9938.3,
    ///     global_time: 0.0,
    /// };
    /// assert_eq!(proton.incident_energy(), 9000.0);
    /// ```
    pub fn incident_energy(&self) -> f64 {
        if self.baryon_number > 0 {
            self.kinetic_energy
        } else {
            self.total_energy
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(pdg_code: i32, baryon_number: i32, is_ion: bool) -> IncidentStep {
        IncidentStep {
            hit_point: Vector3::new(100.0, 0.0, 11200.0),
            momentum_direction: Vector3::z(),
            pdg_code,
            is_ion,
            baryon_number,
            kinetic_energy: 10.0,
            total_energy: 20.0,
            global_time: 3.0,
        }
    }

    #[test]
    fn test_non_baryons_use_total_energy() {
        assert_eq!(step(211, 0, false).incident_energy(), 20.0);
        assert_eq!(step(22, 0, false).incident_energy(), 20.0);
    }

    #[test]
    fn test_ions_mapped_to_alpha() {
        let ion = step(1000060120, 12, true);
        assert_eq!(ion.effective_pdg(), PDG_ALPHA);
        assert_eq!(ion.incident_energy(), 10.0);
    }
}
