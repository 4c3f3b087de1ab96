//! Command abstractions.

use uuid::Uuid;

use crate::ids::{ContextId, ParticipantId};

/// Trait that all game commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;

    /// The game context the command targets.
    fn context_id(&self) -> ContextId;

    /// The participant who issued the command.
    fn actor_id(&self) -> ParticipantId;
}
