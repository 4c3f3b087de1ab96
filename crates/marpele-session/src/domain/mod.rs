//! Session domain model.

pub mod aggregates;
pub mod commands;
pub mod events;
pub mod party;
pub mod registry;
