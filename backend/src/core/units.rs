//! Internal unit system
//!
//! All quantities inside the engine are expressed in a single set of base
//! units so that values read from the library, the geometry tables and the
//! incident step can be combined without conversion:
//!
//! - energy: MeV
//! - length: mm
//! - time: ns
//!
//! Values entering from outside (library energy bins in GeV, fibre tables in
//! cm) are multiplied by the matching constant exactly once, at load time.
//!
//! # Example
//! ```
//! use hf_shower_core_rs::core::units::{CM, GEV, MEV};
//!
//! assert_eq!(2.0 * GEV, 2000.0 * MEV);
//! assert_eq!(25.0 * CM, 250.0);
//! ```

/// One MeV (base energy unit)
pub const MEV: f64 = 1.0;

/// One GeV in internal energy units
pub const GEV: f64 = 1000.0 * MEV;

/// One millimetre (base length unit)
pub const MM: f64 = 1.0;

/// One centimetre in internal length units
pub const CM: f64 = 10.0 * MM;

/// One nanosecond (base time unit)
pub const NS: f64 = 1.0;

/// Speed of light in mm/ns
pub const C_LIGHT: f64 = 299.792458 * MM / NS;

/// One degree in radians
pub const DEG: f64 = std::f64::consts::PI / 180.0;

/// Full turn in radians
pub const TWO_PI: f64 = 2.0 * std::f64::consts::PI;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_ratios() {
        assert_eq!(GEV / MEV, 1000.0);
        assert_eq!(CM / MM, 10.0);
        assert!((180.0 * DEG - std::f64::consts::PI).abs() < 1e-12);
    }
}
