//! The fixed alphabet of player tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A player's piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Token {
    /// 🦋
    Butterfly,
    /// 🐙
    Octopus,
    /// 🐸
    Frog,
    /// 🍄
    Mushroom,
}

impl Token {
    /// Every token, in the order they are offered.
    pub const ALL: [Self; 4] = [Self::Butterfly, Self::Octopus, Self::Frog, Self::Mushroom];

    /// The emoji drawn on the board.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Butterfly => "🦋",
            Self::Octopus => "🐙",
            Self::Frog => "🐸",
            Self::Mushroom => "🍄",
        }
    }

    /// The tokens offered to a party of `seats` players.
    #[must_use]
    pub fn offered(seats: usize) -> &'static [Self] {
        &Self::ALL[..seats.min(Self::ALL.len())]
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
