//! Board geometry: the 100-cell serpentine grid and its jump table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The goal cell. Reaching it wins the game.
pub const GOAL: u8 = 100;

/// Cells per grid row.
pub const GRID_WIDTH: u8 = 10;

/// Standard ladders as `(foot, head)`.
const STANDARD_LADDERS: [(u8, u8); 9] = [
    (5, 27),
    (9, 51),
    (22, 60),
    (28, 54),
    (44, 79),
    (53, 69),
    (66, 88),
    (71, 92),
    (85, 97),
];

/// Standard snakes as `(head, tail)`.
const STANDARD_SNAKES: [(u8, u8); 6] = [(13, 7), (37, 19), (80, 43), (86, 46), (91, 49), (99, 4)];

/// Whether a jump moves a piece up or down the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpKind {
    /// Destination is above the origin.
    Ladder,
    /// Destination is below the origin.
    Snake,
}

/// A single ladder or snake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jump {
    /// Cell the piece lands on.
    pub from: u8,
    /// Cell the piece is carried to.
    pub to: u8,
    /// Ladder or snake, by direction.
    pub kind: JumpKind,
}

impl Jump {
    /// Builds a jump, classifying it by direction.
    #[must_use]
    pub fn new(from: u8, to: u8) -> Self {
        let kind = if to > from {
            JumpKind::Ladder
        } else {
            JumpKind::Snake
        };
        Self { from, to, kind }
    }
}

/// Reasons a jump table is rejected at construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    /// Origins must lie strictly between the start cell and the goal.
    #[error("jump origin {0} is outside 1..100")]
    OriginOutOfRange(u8),

    /// Destinations must be on the board.
    #[error("jump {origin} -> {destination} leaves the board")]
    DestinationOutOfRange {
        /// The offending origin.
        origin: u8,
        /// The offending destination.
        destination: u8,
    },

    /// A cell may be the origin of at most one jump.
    #[error("cell {0} is the origin of more than one jump")]
    DuplicateOrigin(u8),

    /// A jump may not point back at its own origin.
    #[error("jump at cell {0} points to itself")]
    SelfLoop(u8),

    /// Following jumps from this cell never settles.
    #[error("jumps starting at cell {0} form a cycle")]
    Cycle(u8),
}

/// The immutable board: a fixed 100-cell track plus its jump table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    jumps: BTreeMap<u8, u8>,
}

impl Board {
    /// Builds a board from `(origin, destination)` pairs, rejecting any table
    /// that could trap a piece in an endless chain.
    ///
    /// # Errors
    ///
    /// Returns a [`BoardError`] for out-of-range cells, duplicate origins,
    /// self-loops or cycles.
    pub fn new(jumps: impl IntoIterator<Item = (u8, u8)>) -> Result<Self, BoardError> {
        let mut table = BTreeMap::new();
        for (origin, destination) in jumps {
            if origin == 0 || origin >= GOAL {
                return Err(BoardError::OriginOutOfRange(origin));
            }
            if destination == 0 || destination > GOAL {
                return Err(BoardError::DestinationOutOfRange {
                    origin,
                    destination,
                });
            }
            if origin == destination {
                return Err(BoardError::SelfLoop(origin));
            }
            if table.insert(origin, destination).is_some() {
                return Err(BoardError::DuplicateOrigin(origin));
            }
        }

        // A chain longer than the table itself must revisit a cell.
        for &start in table.keys() {
            let mut cell = start;
            let mut steps = 0;
            while let Some(&next) = table.get(&cell) {
                steps += 1;
                if steps > table.len() {
                    return Err(BoardError::Cycle(start));
                }
                cell = next;
            }
        }

        Ok(Self { jumps: table })
    }

    /// The board every game is played on.
    ///
    /// # Panics
    ///
    /// Never in practice: the standard table is checked by unit tests.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(STANDARD_LADDERS.into_iter().chain(STANDARD_SNAKES))
            .expect("standard jump table is valid")
    }

    /// The goal cell.
    #[must_use]
    pub fn goal(&self) -> u8 {
        GOAL
    }

    /// Where a piece landing on `cell` is carried, if anywhere.
    #[must_use]
    pub fn destination(&self, cell: u8) -> Option<u8> {
        self.jumps.get(&cell).copied()
    }

    /// All jumps ordered by origin.
    #[must_use]
    pub fn jumps(&self) -> Vec<Jump> {
        self.jumps
            .iter()
            .map(|(&from, &to)| Jump::new(from, to))
            .collect()
    }
}

/// Logical grid coordinate; row 0 is the top of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridPosition {
    /// Row from the top, `0..10`.
    pub row: u8,
    /// Column from the left, `0..10`.
    pub col: u8,
}

impl GridPosition {
    /// Where pieces that have not entered the board yet are drawn.
    pub const START: Self = Self { row: 9, col: 0 };
}

/// Maps a cell to its place on the serpentine grid. Returns `None` for
/// cells beyond the goal.
#[must_use]
pub fn coordinate_of(cell: u8) -> Option<GridPosition> {
    match cell {
        0 => Some(GridPosition::START),
        1..=GOAL => {
            let index = cell - 1;
            let row = GRID_WIDTH - 1 - index / GRID_WIDTH;
            let mut col = index % GRID_WIDTH;
            if row % 2 == 1 {
                col = GRID_WIDTH - 1 - col;
            }
            Some(GridPosition { row, col })
        }
        _ => None,
    }
}
