//! Scripted uniform sources
//!
//! Replace the generator with a known sequence of draws. Tests use these to
//! pin every coin flip in the selector and the synthesizer; they are also
//! handy for replaying a draw sequence captured elsewhere.

use super::UniformSource;

/// Largest `f64` strictly below 1.0
pub const JUST_BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// Returns the same value on every draw
///
/// # Example
/// ```
/// use hf_shower_core_rs::rng::{FixedSource, UniformSource};
///
/// let mut src = FixedSource::new(0.25);
/// assert_eq!(src.flat(), 0.25);
/// assert_eq!(src.flat(), 0.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSource {
    value: f64,
}

impl FixedSource {
    /// Create a source pinned to `value`, clamped into `[0.0, 1.0)`
    pub fn new(value: f64) -> Self {
        Self {
            value: clamp_unit(value),
        }
    }

    /// Source that returns the largest value below 1.0
    pub fn just_below_one() -> Self {
        Self {
            value: JUST_BELOW_ONE,
        }
    }
}

impl UniformSource for FixedSource {
    fn flat(&mut self) -> f64 {
        self.value
    }
}

/// Cycles through a fixed list of draws
///
/// The sequence wraps around when exhausted; [`SequenceSource::draws`]
/// reports how many values have been handed out so far.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
    draws: usize,
}

impl SequenceSource {
    /// Create a source from `values` (each clamped into `[0.0, 1.0)`)
    ///
    /// # Panics
    /// Panics if `values` is empty
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "sequence must not be empty");
        Self {
            values: values.into_iter().map(clamp_unit).collect(),
            cursor: 0,
            draws: 0,
        }
    }

    /// Number of draws taken so far
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl UniformSource for SequenceSource {
    fn flat(&mut self) -> f64 {
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        self.draws += 1;
        value
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else if value >= 1.0 {
        JUST_BELOW_ONE
    } else {
        value
    }
}
