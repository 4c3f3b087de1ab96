//! Registry implementations.

pub mod memory_registry;
