//! Domain event abstractions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata attached to every domain event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Type name for routing (e.g. `session.dice_rolled`).
    pub event_type: String,
    /// The game this event belongs to.
    pub aggregate_id: Uuid,
    /// Monotonically increasing version within the game.
    pub sequence_number: i64,
    /// Correlation ID for tracing a command through its effects.
    pub correlation_id: Uuid,
    /// Causation ID linking this event to the command that caused it.
    pub causation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

/// Something that happened to a game, with enough metadata to order and
/// trace it.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Dotted type name, such as `session.cancelled`.
    fn event_type(&self) -> &'static str;

    /// The event body as JSON, for structured logs.
    fn to_payload(&self) -> serde_json::Value;

    /// Envelope shared by every event.
    fn metadata(&self) -> &EventMetadata;
}
