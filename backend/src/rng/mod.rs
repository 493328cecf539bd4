//! Uniform random sources
//!
//! The engine never owns a random engine of its own. Every component that
//! needs randomness takes a `&mut` reference to something implementing
//! [`UniformSource`] at call time, so the caller decides how draws are seeded
//! and replayed.
//!
//! - [`RngManager`]: deterministic xorshift64* generator for production runs
//! - [`FixedSource`] / [`SequenceSource`]: scripted draws for tests and replay

mod scripted;
mod xorshift;

pub use scripted::{FixedSource, SequenceSource, JUST_BELOW_ONE};
pub use xorshift::RngManager;

/// A source of uniform draws in `[0.0, 1.0)`
///
/// # Example
/// ```
/// use hf_shower_core_rs::rng::{RngManager, UniformSource};
///
/// fn coin(rng: &mut impl UniformSource) -> bool {
///     rng.flat() < 0.5
/// }
///
/// let mut rng = RngManager::new(7);
/// let _ = coin(&mut rng);
/// ```
pub trait UniformSource {
    /// Next draw in `[0.0, 1.0)`
    fn flat(&mut self) -> f64;
}

impl<T: UniformSource + ?Sized> UniformSource for &mut T {
    fn flat(&mut self) -> f64 {
        (**self).flat()
    }
}

impl<T: UniformSource + ?Sized> UniformSource for Box<T> {
    fn flat(&mut self) -> f64 {
        (**self).flat()
    }
}
