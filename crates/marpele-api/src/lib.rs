//! Marpele HTTP API: routes, configuration and server bootstrap pieces.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod sweeper;
pub mod telemetry;
