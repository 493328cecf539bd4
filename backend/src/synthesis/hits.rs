//! Hit Synthesizer
//!
//! For each buffered photon, in buffer order:
//!
//! 1. pre-filter on the local longitudinal position and the wavelength
//! 2. choose the fibre depth
//! 3. rotate into the detector orientation and translate to the entry point
//! 4. ask the fibre model for the path length to the photomultiplier
//! 5. compute radius, azimuth and distance to the nearest wedge edge
//! 6. apply the acceptance cuts (all must pass)
//! 7. time-stamp and emit the hit
//! 8. in long-fibre-only mode, give photons in the short-fibre range a
//!    second, independent chance to produce a short-fibre hit
//!
//! # Draw order
//!
//! Per photon: the depth draw (backward particles only, outside long-only
//! mode), then `r1`, `r2`, `r3` (`r3` for backward particles only), then
//! the two redraws of the second pass when it applies. The number of draws
//! never depends on whether a cut passed.

use crate::fibre::{FibreTransport, ShiftMode};
use crate::geometry::{perp, wedge_edge_distance, wrapped_azimuth, DirectionAngles, GeometryParams};
use crate::models::{Depth, Hit, PhotonBuffer, PhotonSample};
use crate::rng::UniformSource;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Value standing in for `r3` when the particle is not backward
const NO_BACK_DRAW: f64 = -9999.0;

/// Tunable acceptance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisSettings {
    /// Maximum acceptance probability (scaled by the step weight)
    pub prob_max: f64,
    /// Probability that light from a backward-going shower is seen
    pub back_probability: f64,
    /// Time-stamp with the eta-equalized fibre path
    pub equalize_time_shift: bool,
    /// Apply the distance-to-wedge-edge cut
    pub apply_fiducial_cut: bool,
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            prob_max: 1.0,
            back_probability: 0.2,
            equalize_time_shift: false,
            apply_fiducial_cut: true,
        }
    }
}

/// Entry point and orientation of the incident particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncidentFrame {
    pub hit_point: Vector3<f64>,
    pub angles: DirectionAngles,
    /// Moving towards the interaction point (halo) rather than away from it
    pub backward: bool,
}

impl IncidentFrame {
    pub fn new(hit_point: Vector3<f64>, momentum_direction: &Vector3<f64>) -> Self {
        Self {
            hit_point,
            angles: DirectionAngles::from_direction(momentum_direction),
            backward: momentum_direction.z * hit_point.z < 0.0,
        }
    }
}

/// Places buffered photons in the detector and applies the acceptance cuts
///
/// # Example
/// ```
/// use hf_shower_core_rs::fibre::TransparentFibre;
/// use hf_shower_core_rs::geometry::GeometryParams;
/// use hf_shower_core_rs::models::{PhotonBuffer, PhotonSample};
/// use hf_shower_core_rs::rng::FixedSource;
/// use hf_shower_core_rs::synthesis::{HitSynthesizer, IncidentFrame, SynthesisSettings};
/// use nalgebra::Vector3;
///
/// let geometry = GeometryParams::from_tables(&[0.0, 1e6], &[0.1], &[50.0, 200.0, 0.0, 0.0, 100.0, 5.0]).unwrap();
/// let synthesizer = HitSynthesizer::new(geometry, SynthesisSettings::default());
///
/// let buffer: PhotonBuffer = vec![PhotonSample::new(0.0, 0.0, 1.0, 400.0, 0.0)].into_iter().collect();
/// let frame = IncidentFrame::new(Vector3::new(500.0, 0.0, 150.0), &Vector3::x());
/// let hits = synthesizer.synthesize(&buffer, &frame, 1.0, 0.0, false, &TransparentFibre, &mut FixedSource::new(0.0));
/// assert_eq!(hits.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HitSynthesizer {
    geometry: GeometryParams,
    settings: SynthesisSettings,
}

impl HitSynthesizer {
    pub fn new(geometry: GeometryParams, settings: SynthesisSettings) -> Self {
        Self { geometry, settings }
    }

    pub fn geometry(&self) -> &GeometryParams {
        &self.geometry
    }

    pub fn settings(&self) -> &SynthesisSettings {
        &self.settings
    }

    /// Hits for every photon in `buffer`, in buffer order
    #[allow(clippy::too_many_arguments)]
    pub fn synthesize<F, R>(
        &self,
        buffer: &PhotonBuffer,
        frame: &IncidentFrame,
        weight: f64,
        t_slice: f64,
        only_long: bool,
        fibre: &F,
        rng: &mut R,
    ) -> Vec<Hit>
    where
        F: FibreTransport + ?Sized,
        R: UniformSource + ?Sized,
    {
        let mut hits = Vec::new();
        for (i, photon) in buffer.iter().enumerate() {
            tracing::trace!(index = i, %photon, "synthesizing");
            self.place_photon(photon, frame, weight, t_slice, only_long, fibre, rng, &mut hits);
        }

        tracing::debug!(hits = hits.len(), npe = buffer.npe(), "hit synthesis complete");
        if hits.len() > buffer.npe() && !only_long {
            tracing::warn!(
                npe = buffer.npe(),
                hits = hits.len(),
                "photon buffer smaller than the number of hits"
            );
        }
        hits
    }

    /// Photons outside the active length or without a wavelength never count
    fn passes_prefilter(&self, photon: &PhotonSample, only_long: bool) -> bool {
        let zv = photon.z.abs();
        zv <= self.geometry.active_length()
            && photon.lambda > 0.0
            && (photon.z >= 0.0 || (zv > self.geometry.short_fibre_length() && !only_long))
    }

    fn choose_depth<R: UniformSource + ?Sized>(
        &self,
        photon: &PhotonSample,
        frame: &IncidentFrame,
        only_long: bool,
        rng: &mut R,
    ) -> Depth {
        if only_long {
            Depth::Long
        } else if !frame.backward {
            if photon.z < 0.0 {
                Depth::Short
            } else {
                Depth::Long
            }
        } else if rng.flat() > 0.5 {
            Depth::Short
        } else {
            Depth::Long
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn place_photon<F, R>(
        &self,
        photon: &PhotonSample,
        frame: &IncidentFrame,
        weight: f64,
        t_slice: f64,
        only_long: bool,
        fibre: &F,
        rng: &mut R,
        hits: &mut Vec<Hit>,
    ) where
        F: FibreTransport + ?Sized,
        R: UniformSource + ?Sized,
    {
        if !self.passes_prefilter(photon, only_long) {
            return;
        }
        let g = &self.geometry;
        let depth = self.choose_depth(photon, frame, only_long, rng);

        let offset = frame.angles.rotate_to_global(photon.x, photon.y, photon.z.abs());
        let position = frame.hit_point + offset;
        let local = Vector3::new(position.x, position.y, g.local_z(position.z));
        let path = fibre.z_shift(&local, depth, ShiftMode::EmissionPoint);

        let r = perp(&position);
        let attenuation = fibre.attenuation_length(photon.lambda);
        let survival = (-attenuation * path).exp();
        let fi = wrapped_azimuth(&position);
        let mut dfir = wedge_edge_distance(r, fi, g.dphi);
        if !self.settings.apply_fiducial_cut {
            dfir += g.min_edge_distance();
        }
        let zz = position.z.abs();

        let r1 = rng.flat();
        let r2 = rng.flat();
        let r3 = if frame.backward { rng.flat() } else { NO_BACK_DRAW };

        let accepted = g.r_inside(r)
            && r1 <= survival
            && r2 <= self.settings.prob_max * weight
            && dfir > g.min_edge_distance()
            && g.within_active_length(zz)
            && r3 <= self.settings.back_probability
            && (depth != Depth::Short || zz >= g.front_face() + g.short_fibre_length());

        tracing::trace!(
            r,
            fi,
            dfir,
            zz,
            path,
            r_inside = g.r_inside(r),
            attenuation_pass = r1 <= survival,
            probability_pass = r2 <= self.settings.prob_max * weight,
            back_pass = r3 <= self.settings.back_probability,
            accepted,
            "acceptance"
        );

        let mode = ShiftMode::for_timing(self.settings.equalize_time_shift);
        if accepted {
            hits.push(Hit {
                position,
                depth,
                time: t_slice + photon.t + fibre.time_shift(&local, depth, mode),
            });
        }

        if only_long && g.within_short_fibre_range(zz) {
            let r1 = rng.flat();
            let r2 = rng.flat();
            if g.r_inside(r) && r1 <= survival && r2 <= self.settings.prob_max && dfir > g.min_edge_distance() {
                hits.push(Hit {
                    position,
                    depth: Depth::Short,
                    time: t_slice + photon.t + fibre.time_shift(&local, Depth::Short, mode),
                });
            }
        }
    }
}
