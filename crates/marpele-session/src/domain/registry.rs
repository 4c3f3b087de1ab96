//! Session registry abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marpele_core::error::GameError;
use marpele_core::ids::ContextId;

use super::aggregates::GameSession;

/// Owns every live session, at most one per context.
///
/// Implementations must serialize access to their map so that concurrent
/// calls for different contexts never observe a half-written entry.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Registers a freshly opened session.
    ///
    /// # Errors
    ///
    /// Returns `GameError::AlreadyActive` if the context already hosts a game.
    async fn create(&self, session: GameSession) -> Result<(), GameError>;

    /// Returns a snapshot of the context's session.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoActiveGame` if the context hosts no game.
    async fn load(&self, context_id: ContextId) -> Result<GameSession, GameError>;

    /// Stores a mutated session if nobody else committed since it was loaded
    /// at `expected_version`. A terminal session is removed instead.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoActiveGame` if the entry vanished and
    /// `GameError::ConcurrencyConflict` if its version moved on.
    async fn commit(&self, session: GameSession, expected_version: i64) -> Result<(), GameError>;

    /// Removes the context's session. Removing an absent session succeeds.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Infrastructure` if the registry is unusable.
    async fn destroy(&self, context_id: ContextId) -> Result<(), GameError>;

    /// Contexts whose session has seen no event since `cutoff`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Infrastructure` if the registry is unusable.
    async fn idle_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<ContextId>, GameError>;

    /// Removes the context's session only if it is still idle since
    /// `cutoff`. The check and the removal are atomic, so a session touched
    /// after [`SessionRegistry::idle_since`] listed it survives.
    ///
    /// Returns whether a session was removed.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Infrastructure` if the registry is unusable.
    async fn expire_if_idle(
        &self,
        context_id: ContextId,
        cutoff: DateTime<Utc>,
    ) -> Result<bool, GameError>;

    /// Number of live sessions.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Infrastructure` if the registry is unusable.
    async fn active_count(&self) -> Result<usize, GameError>;
}
