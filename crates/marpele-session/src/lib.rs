//! Marpele — Game Sessions.
//!
//! Responsible for a game's lifecycle inside one chat: choosing party size
//! and difficulty, handing out tokens, taking turns, and ending the game on
//! a win or a cancellation.

pub mod application;
pub mod domain;
pub mod infrastructure;
