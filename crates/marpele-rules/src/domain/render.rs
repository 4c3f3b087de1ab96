//! Board rendering collaborator.
//!
//! The session core hands the renderer a snapshot of piece positions and
//! gets opaque bytes back. Pixel rendering lives outside this workspace;
//! [`TextBoardRenderer`] draws the grid as UTF-8 text for chat transports.

use std::fmt::Write as _;

use marpele_core::error::GameError;
use marpele_core::ids::ParticipantId;

use super::board::{Board, GRID_WIDTH, GOAL, coordinate_of};
use super::token::Token;

/// One participant's piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    /// Owner of the piece.
    pub participant: ParticipantId,
    /// The piece's token.
    pub token: Token,
    /// Current cell, `0..=100`.
    pub cell: u8,
}

/// Everything needed to draw the board at one moment.
#[derive(Debug, Clone)]
pub struct BoardSnapshot<'a> {
    /// The board being played on.
    pub board: &'a Board,
    /// Pieces in turn order.
    pub pieces: Vec<Piece>,
}

/// Renders a board snapshot to bytes (an image, text, ...).
pub trait BoardRenderer: Send + Sync {
    /// MIME type of the produced bytes.
    fn content_type(&self) -> &'static str;

    /// Draws the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Infrastructure` if drawing fails.
    fn render(&self, snapshot: &BoardSnapshot<'_>) -> Result<Vec<u8>, GameError>;
}

/// Draws the board as a 10x10 text grid, top row first.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextBoardRenderer;

impl BoardRenderer for TextBoardRenderer {
    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn render(&self, snapshot: &BoardSnapshot<'_>) -> Result<Vec<u8>, GameError> {
        let width = usize::from(GRID_WIDTH);
        let mut grid = vec![vec![String::new(); width]; width];

        for cell in 1..=GOAL {
            let position = coordinate_of(cell).ok_or_else(|| {
                GameError::Infrastructure(format!("cell {cell} has no grid position"))
            })?;
            let occupants: String = snapshot
                .pieces
                .iter()
                .filter(|piece| piece.cell == cell)
                .map(|piece| piece.token.symbol())
                .collect();
            let label = if occupants.is_empty() {
                match snapshot.board.destination(cell) {
                    Some(to) if to > cell => format!("{cell}^"),
                    Some(_) => format!("{cell}v"),
                    None => cell.to_string(),
                }
            } else {
                occupants
            };
            grid[usize::from(position.row)][usize::from(position.col)] = label;
        }

        let mut out = String::new();
        for row in &grid {
            let line: Vec<String> = row.iter().map(|label| format!("{label:>4}")).collect();
            let _ = writeln!(out, "{}", line.join(" "));
        }

        let waiting: Vec<&str> = snapshot
            .pieces
            .iter()
            .filter(|piece| piece.cell == 0)
            .map(|piece| piece.token.symbol())
            .collect();
        if !waiting.is_empty() {
            let _ = writeln!(out, "waiting: {}", waiting.join(" "));
        }

        Ok(out.into_bytes())
    }
}
