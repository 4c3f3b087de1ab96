//! Application layer: command handlers and read views.

pub mod command_handlers;
pub mod query_handlers;
