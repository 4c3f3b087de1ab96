//! Event-sourced aggregates.

use uuid::Uuid;

use crate::event::DomainEvent;

/// A game-state owner whose fields only ever change by applying its own
/// events. The version counts applied events and doubles as the optimistic
/// concurrency token when the aggregate is committed.
pub trait AggregateRoot: Send + Sync {
    /// Events recorded and replayed by this aggregate.
    type Event: DomainEvent;

    /// The game's identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Number of events applied so far.
    fn version(&self) -> i64;

    /// Folds one event into the state.
    fn apply(&mut self, event: &Self::Event);

    /// Events recorded since the last commit, oldest first.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Hands the pending events to the caller and clears them.
    fn take_uncommitted_events(&mut self) -> Vec<Self::Event>;
}
