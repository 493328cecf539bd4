//! Detector geometry and frame transformations
//!
//! # Frames
//!
//! Library photons are recorded in a local shower frame whose z axis points
//! along the incident direction. Placing a photon in the detector means
//! rotating it by the incident polar angle θ and azimuth φ, then translating
//! it to the entry point.
//!
//! # Wedges
//!
//! The calorimeter is segmented in azimuth into wedges of full width
//! `2·dphi`, centred on even multiples of `dphi` so that the edges sit on odd
//! multiples. The lateral (fiducial) cut needs the distance from a point to
//! the nearest wedge edge, measured along the arc at the point's radius.

use crate::core::units::TWO_PI;
use crate::engine::ConfigError;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Read-only detector constants used by the acceptance cuts
///
/// `gpar` layout (mm):
/// - `gpar[0]`: short fibre offset (short fibres start this far behind the front face)
/// - `gpar[1]`: total active length
/// - `gpar[4]`: longitudinal position of the front face
/// - `gpar[5]`: minimum distance to a wedge edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryParams {
    pub r_min: f64,
    pub r_max: f64,
    /// Half width of one azimuthal wedge (rad)
    pub dphi: f64,
    pub gpar: [f64; 6],
}

impl GeometryParams {
    /// Build from the detector tables
    ///
    /// `r_min`/`r_max` are the first and last radius table entries, `dphi`
    /// the first phi table entry.
    ///
    /// # Errors
    /// `ConfigError::InvalidGeometry` if a table is empty, `gpar` does not
    /// hold six values, the radii are inverted or `dphi` is not positive.
    pub fn from_tables(r_table: &[f64], phi_table: &[f64], gpar: &[f64]) -> Result<Self, ConfigError> {
        let (r_min, r_max) = match (r_table.first(), r_table.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(ConfigError::InvalidGeometry("radius table is empty".to_string())),
        };
        let dphi = *phi_table
            .first()
            .ok_or_else(|| ConfigError::InvalidGeometry("phi table is empty".to_string()))?;
        let gpar: [f64; 6] = gpar.try_into().map_err(|_| {
            ConfigError::InvalidGeometry(format!("gpar needs 6 values, got {}", gpar.len()))
        })?;

        let params = Self {
            r_min,
            r_max,
            dphi,
            gpar,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.r_min > self.r_max {
            return Err(ConfigError::InvalidGeometry(format!(
                "r_min {} exceeds r_max {}",
                self.r_min, self.r_max
            )));
        }
        if !(self.dphi > 0.0) {
            return Err(ConfigError::InvalidGeometry(format!(
                "dphi must be positive, got {}",
                self.dphi
            )));
        }
        if self.gpar[1] <= 0.0 {
            return Err(ConfigError::InvalidGeometry(format!(
                "active length gpar[1] must be positive, got {}",
                self.gpar[1]
            )));
        }
        Ok(())
    }

    /// Radial acceptance, bounds inclusive
    pub fn r_inside(&self, r: f64) -> bool {
        r >= self.r_min && r <= self.r_max
    }

    pub fn short_fibre_length(&self) -> f64 {
        self.gpar[0]
    }

    pub fn active_length(&self) -> f64 {
        self.gpar[1]
    }

    pub fn front_face(&self) -> f64 {
        self.gpar[4]
    }

    pub fn min_edge_distance(&self) -> f64 {
        self.gpar[5]
    }

    /// `[front, front + active_length]`, inclusive
    pub fn within_active_length(&self, abs_z: f64) -> bool {
        abs_z >= self.gpar[4] && abs_z <= self.gpar[4] + self.gpar[1]
    }

    /// `[front + short_offset, front + active_length]`, inclusive
    pub fn within_short_fibre_range(&self, abs_z: f64) -> bool {
        abs_z >= self.gpar[4] + self.gpar[0] && abs_z <= self.gpar[4] + self.gpar[1]
    }

    /// Longitudinal coordinate relative to the middle of the absorber
    pub fn local_z(&self, global_z: f64) -> f64 {
        global_z.abs() - self.gpar[4] - 0.5 * self.gpar[1]
    }
}

/// Cached trigonometry of an incident direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionAngles {
    pub sin_theta: f64,
    pub cos_theta: f64,
    pub sin_phi: f64,
    pub cos_phi: f64,
}

impl DirectionAngles {
    pub fn from_angles(theta: f64, phi: f64) -> Self {
        Self {
            sin_theta: theta.sin(),
            cos_theta: theta.cos(),
            sin_phi: phi.sin(),
            cos_phi: phi.cos(),
        }
    }

    /// Polar and azimuthal angle of `direction` (need not be normalised)
    pub fn from_direction(direction: &Vector3<f64>) -> Self {
        let perp = direction.x.hypot(direction.y);
        let theta = if perp == 0.0 && direction.z == 0.0 {
            0.0
        } else {
            perp.atan2(direction.z)
        };
        Self::from_angles(theta, azimuth(direction))
    }

    /// Rotate a local shower-frame point into the detector orientation
    ///
    /// # Example
    /// ```
    /// use hf_shower_core_rs::geometry::DirectionAngles;
    ///
    /// let identity = DirectionAngles::from_angles(0.0, 0.0);
    /// let p = identity.rotate_to_global(1.0, 2.0, 3.0);
    /// assert_eq!((p.x, p.y, p.z), (1.0, 2.0, 3.0));
    /// ```
    pub fn rotate_to_global(&self, x: f64, y: f64, z: f64) -> Vector3<f64> {
        let xx = x * self.cos_theta * self.cos_phi - y * self.sin_phi + z * self.sin_theta * self.cos_phi;
        let yy = x * self.cos_theta * self.sin_phi + y * self.cos_phi + z * self.sin_theta * self.sin_phi;
        let zz = -x * self.sin_theta + z * self.cos_theta;
        Vector3::new(xx, yy, zz)
    }
}

/// Azimuth in `(-π, π]`; zero for points on the z axis
pub fn azimuth(v: &Vector3<f64>) -> f64 {
    if v.x == 0.0 && v.y == 0.0 {
        0.0
    } else {
        v.y.atan2(v.x)
    }
}

/// Azimuth folded into `[0, 2π)`
pub fn wrapped_azimuth(v: &Vector3<f64>) -> f64 {
    let fi = azimuth(v);
    if fi < 0.0 {
        fi + TWO_PI
    } else {
        fi
    }
}

/// Transverse distance from the z axis
pub fn perp(v: &Vector3<f64>) -> f64 {
    v.x.hypot(v.y)
}

/// Index (1-based) of the wedge edge nearest to an azimuth in `[0, 2π)`
///
/// The half-sectors on either side of an edge fold onto the same index;
/// edge `k` sits at `(2k − 1)·dphi`.
pub fn wedge_index(fi: f64, dphi: f64) -> i64 {
    let half_sector = (fi / dphi) as i64 + 1;
    (half_sector + 1) / 2
}

/// Distance at radius `r` from azimuth `fi` to the nearest wedge edge
///
/// # Example
/// ```
/// use hf_shower_core_rs::geometry::wedge_edge_distance;
///
/// // A wedge centre (fi = 0) is dphi away from both edges
/// let d = wedge_edge_distance(100.0, 0.0, 0.1);
/// assert!((d - 100.0 * 0.1_f64.sin()).abs() < 1e-12);
/// ```
pub fn wedge_edge_distance(r: f64, fi: f64, dphi: f64) -> f64 {
    let isect = wedge_index(fi, dphi);
    let dfi = ((isect * 2 - 1) as f64 * dphi - fi).abs();
    r * dfi.sin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn params() -> GeometryParams {
        GeometryParams::from_tables(&[125.0, 600.0, 1300.0], &[0.0873, 0.1745], &[50.0, 200.0, 0.0, 0.0, 100.0, 5.0])
            .unwrap()
    }

    #[test]
    fn test_from_tables_takes_extremes() {
        let g = params();
        assert_eq!(g.r_min, 125.0);
        assert_eq!(g.r_max, 1300.0);
        assert_eq!(g.dphi, 0.0873);
        assert!(g.r_inside(125.0));
        assert!(g.r_inside(1300.0));
        assert!(!g.r_inside(1300.1));
    }

    #[test]
    fn test_from_tables_rejects_short_gpar() {
        let err = GeometryParams::from_tables(&[1.0, 2.0], &[0.1], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGeometry(_)));
    }

    #[test]
    fn test_from_tables_rejects_empty_tables() {
        assert!(GeometryParams::from_tables(&[], &[0.1], &[0.0; 6]).is_err());
        assert!(GeometryParams::from_tables(&[1.0], &[], &[0.0; 6]).is_err());
    }

    #[test]
    fn test_transverse_rotation() {
        // θ = π/2, φ = 0: local z maps onto global x
        let angles = DirectionAngles::from_angles(FRAC_PI_2, 0.0);
        let p = angles.rotate_to_global(0.0, 0.0, 1.0);
        assert!((p.x - 1.0).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
        assert!(p.z.abs() < 1e-12);
    }

    #[test]
    fn test_direction_angles_from_vector() {
        let angles = DirectionAngles::from_direction(&Vector3::new(0.0, 1.0, 0.0));
        assert!((angles.sin_theta - 1.0).abs() < 1e-12);
        assert!((angles.sin_phi - 1.0).abs() < 1e-12);

        let along_z = DirectionAngles::from_direction(&Vector3::new(0.0, 0.0, -1.0));
        assert!((along_z.cos_theta + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_wrapped_azimuth_range() {
        let fi = wrapped_azimuth(&Vector3::new(0.0, -1.0, 0.0));
        assert!((fi - 1.5 * PI).abs() < 1e-12);
        assert_eq!(wrapped_azimuth(&Vector3::new(0.0, 0.0, 5.0)), 0.0);
    }

    #[test]
    fn test_wedge_folding_symmetric() {
        let dphi = 0.1;
        // Mirror images around the first edge (at dphi)
        let below = wedge_edge_distance(100.0, 0.03, dphi);
        let above = wedge_edge_distance(100.0, 0.17, dphi);
        assert_eq!(wedge_index(0.03, dphi), 1);
        assert_eq!(wedge_index(0.17, dphi), 1);
        assert!((below - above).abs() < 1e-9);
    }

    #[test]
    fn test_local_z_centred_on_absorber() {
        let g = params();
        assert_eq!(g.local_z(200.0), 0.0);
        assert_eq!(g.local_z(-300.0), 100.0);
    }
}
