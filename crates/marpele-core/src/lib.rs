//! Marpele Core — shared domain abstractions.
//!
//! This crate defines the identifiers, traits and error taxonomy that the
//! rules, session and transport crates depend on. It contains no
//! infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod ids;
pub mod rng;
