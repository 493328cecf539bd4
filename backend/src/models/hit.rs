//! Hits emitted by the synthesizer
//!
//! A hit is one accepted photo-electron placed in the global detector frame,
//! attributed to one of the two fibre readouts and stamped with its arrival
//! time at the photomultiplier.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fibre readout a hit is attributed to
///
/// Serialized as its depth number (1 = long, 2 = short).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Depth {
    /// Long fibre, starting at the front face of the absorber
    Long,
    /// Short fibre, starting `gpar[0]` behind the front face
    Short,
}

impl Depth {
    /// Depth number as used by the readout (1 or 2)
    pub fn number(self) -> u8 {
        match self {
            Depth::Long => 1,
            Depth::Short => 2,
        }
    }
}

impl From<Depth> for u8 {
    fn from(depth: Depth) -> Self {
        depth.number()
    }
}

impl TryFrom<u8> for Depth {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Depth::Long),
            2 => Ok(Depth::Short),
            other => Err(format!("invalid fibre depth {}, expected 1 or 2", other)),
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// One accepted photo-electron in the global frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Global position (mm)
    pub position: Vector3<f64>,
    pub depth: Depth,
    /// Arrival time at the PMT (ns)
    pub time: f64,
}
