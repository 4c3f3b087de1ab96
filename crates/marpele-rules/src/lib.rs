//! Marpele — Rules & Movement.
//!
//! Responsible for the static board (cells, ladders, snakes), dice faces,
//! turning a roll into a new position, and drawing the board for the
//! transport layer.

pub mod domain;
