//! Pure rules domain: no I/O, no clocks, no randomness.

pub mod board;
pub mod dice;
pub mod movement;
pub mod render;
pub mod token;
