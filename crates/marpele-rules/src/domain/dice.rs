//! Six-sided die faces.

use std::fmt;

use serde::Serialize;

/// The face a piece needs to enter the board on hard difficulty.
pub const ENTRY_FACE: u8 = 6;

/// A value shown by a six-sided die. Always in `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DieFace(u8);

impl DieFace {
    /// Lowest face.
    pub const MIN: u32 = 1;
    /// Highest face.
    pub const MAX: u32 = 6;

    /// The face value.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u32> for DieFace {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(face @ 1..=6) => Ok(Self(face)),
            _ => Err(value),
        }
    }
}

impl fmt::Display for DieFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
