//! Movement resolution: dice roll + current cell -> new cell.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::{Board, Jump};
use super::dice::{DieFace, ENTRY_FACE};

/// How pieces enter the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Any roll moves a waiting piece onto the board.
    Easy,
    /// A waiting piece needs a six to enter, and enters on cell 1.
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Easy => "easy",
            Self::Hard => "hard",
        })
    }
}

/// The result of moving one piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveResolution {
    /// Cell before the roll.
    pub from: u8,
    /// Cell after the roll and every jump it triggered.
    pub to: u8,
    /// The piece needed a six to enter and did not roll one.
    pub entry_denied: bool,
    /// The roll would have carried the piece past the goal.
    pub overshoot: bool,
    /// Ladders and snakes taken, in order.
    pub jumps: Vec<Jump>,
}

impl MoveResolution {
    /// Whether the piece reached the goal.
    #[must_use]
    pub fn is_win(&self, board: &Board) -> bool {
        self.to >= board.goal()
    }

    fn stay(from: u8, entry_denied: bool, overshoot: bool) -> Self {
        Self {
            from,
            to: from,
            entry_denied,
            overshoot,
            jumps: Vec::new(),
        }
    }
}

/// Computes where a piece on `current` ends up after rolling `face`.
///
/// `current` must be on the board (`0..=100`). A roll that would pass the
/// goal leaves the piece where it is; landing on a jump origin keeps
/// following jumps until the piece settles.
#[must_use]
pub fn resolve(board: &Board, current: u8, face: DieFace, difficulty: Difficulty) -> MoveResolution {
    let candidate = if difficulty == Difficulty::Hard && current == 0 {
        if face.value() != ENTRY_FACE {
            return MoveResolution::stay(current, true, false);
        }
        1
    } else {
        current.saturating_add(face.value())
    };

    if candidate > board.goal() {
        return MoveResolution::stay(current, false, true);
    }

    let mut cell = candidate;
    let mut jumps = Vec::new();
    while let Some(next) = board.destination(cell) {
        jumps.push(Jump::new(cell, next));
        cell = next;
    }

    MoveResolution {
        from: current,
        to: cell,
        entry_denied: false,
        overshoot: false,
        jumps,
    }
}
