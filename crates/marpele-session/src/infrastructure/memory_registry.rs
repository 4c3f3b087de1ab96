//! In-memory session registry.
//!
//! Sessions live only as long as the process. One `Mutex` guards the whole
//! map; it is never held across an `.await`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marpele_core::aggregate::AggregateRoot;
use marpele_core::error::GameError;
use marpele_core::ids::ContextId;
use tracing::debug;

use crate::domain::aggregates::GameSession;
use crate::domain::party::Phase;
use crate::domain::registry::SessionRegistry;

/// Process-local [`SessionRegistry`].
#[derive(Debug, Default)]
pub struct InMemorySessionRegistry {
    sessions: Mutex<HashMap<ContextId, GameSession>>,
}

impl InMemorySessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> Result<MutexGuard<'_, HashMap<ContextId, GameSession>>, GameError> {
        self.sessions
            .lock()
            .map_err(|e| GameError::Infrastructure(format!("registry mutex poisoned: {e}")))
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn create(&self, session: GameSession) -> Result<(), GameError> {
        let mut sessions = self.sessions()?;
        if sessions.contains_key(&session.context_id) {
            return Err(GameError::AlreadyActive(session.context_id));
        }
        debug!(context_id = %session.context_id, game_id = %session.id, "registered session");
        sessions.insert(session.context_id, session);
        Ok(())
    }

    async fn load(&self, context_id: ContextId) -> Result<GameSession, GameError> {
        self.sessions()?
            .get(&context_id)
            .cloned()
            .ok_or(GameError::NoActiveGame(context_id))
    }

    async fn commit(&self, session: GameSession, expected_version: i64) -> Result<(), GameError> {
        let context_id = session.context_id;
        let mut sessions = self.sessions()?;
        let stored = sessions
            .get(&context_id)
            .ok_or(GameError::NoActiveGame(context_id))?;

        // A different game id means the loaded game ended and another took its place.
        if stored.id != session.id || stored.version() != expected_version {
            return Err(GameError::ConcurrencyConflict {
                context_id,
                expected: expected_version,
                actual: stored.version(),
            });
        }

        if session.phase() == Phase::Terminal {
            debug!(%context_id, game_id = %session.id, "removed terminal session");
            sessions.remove(&context_id);
        } else {
            sessions.insert(context_id, session);
        }
        Ok(())
    }

    async fn destroy(&self, context_id: ContextId) -> Result<(), GameError> {
        if self.sessions()?.remove(&context_id).is_some() {
            debug!(%context_id, "destroyed session");
        }
        Ok(())
    }

    async fn idle_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<ContextId>, GameError> {
        let mut idle: Vec<ContextId> = self
            .sessions()?
            .values()
            .filter(|session| session.last_activity() < cutoff)
            .map(|session| session.context_id)
            .collect();
        idle.sort_unstable();
        Ok(idle)
    }

    async fn expire_if_idle(
        &self,
        context_id: ContextId,
        cutoff: DateTime<Utc>,
    ) -> Result<bool, GameError> {
        let mut sessions = self.sessions()?;
        let still_idle = sessions
            .get(&context_id)
            .is_some_and(|session| session.last_activity() < cutoff);
        if still_idle {
            sessions.remove(&context_id);
            debug!(%context_id, %cutoff, "expired idle session");
        }
        Ok(still_idle)
    }

    async fn active_count(&self) -> Result<usize, GameError> {
        Ok(self.sessions()?.len())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};
    use marpele_core::aggregate::AggregateRoot;
    use marpele_core::error::GameError;
    use marpele_core::ids::{ContextId, ParticipantId};
    use marpele_test_support::FixedClock;
    use uuid::Uuid;

    use super::InMemorySessionRegistry;
    use crate::domain::aggregates::GameSession;
    use crate::domain::party::{CancelPolicy, Capacity};
    use crate::domain::registry::SessionRegistry;

    fn clock_at(hour: u32) -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, hour, 0, 0).unwrap())
    }

    fn opened(context_id: ContextId, clock: &FixedClock) -> GameSession {
        let mut session = GameSession::new(Uuid::new_v4(), context_id, ParticipantId(1));
        session.open(Uuid::new_v4(), clock).unwrap();
        session.take_uncommitted_events();
        session
    }

    #[tokio::test]
    async fn test_create_rejects_second_session_in_same_context() {
        let registry = InMemorySessionRegistry::new();
        let clock = clock_at(10);
        registry.create(opened(ContextId(1), &clock)).await.unwrap();

        let result = registry.create(opened(ContextId(1), &clock)).await;

        match result.unwrap_err() {
            GameError::AlreadyActive(id) => assert_eq!(id, ContextId(1)),
            other => panic!("expected AlreadyActive, got {other:?}"),
        }
        assert_eq!(registry.active_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_contexts_are_independent() {
        let registry = InMemorySessionRegistry::new();
        let clock = clock_at(10);
        registry.create(opened(ContextId(1), &clock)).await.unwrap();
        registry.create(opened(ContextId(2), &clock)).await.unwrap();
        assert_eq!(registry.active_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_commit_replaces_session_at_expected_version() {
        let registry = InMemorySessionRegistry::new();
        let clock = clock_at(10);
        registry.create(opened(ContextId(1), &clock)).await.unwrap();

        let mut session = registry.load(ContextId(1)).await.unwrap();
        let expected = session.version();
        session
            .choose_capacity(ParticipantId(1), Capacity::Two, Uuid::new_v4(), &clock)
            .unwrap();
        registry.commit(session, expected).await.unwrap();

        let reloaded = registry.load(ContextId(1)).await.unwrap();
        assert_eq!(reloaded.version(), expected + 1);
        assert_eq!(reloaded.capacity(), Some(Capacity::Two));
    }

    #[tokio::test]
    async fn test_commit_detects_stale_version() {
        let registry = InMemorySessionRegistry::new();
        let clock = clock_at(10);
        registry.create(opened(ContextId(1), &clock)).await.unwrap();

        let mut first = registry.load(ContextId(1)).await.unwrap();
        let mut second = registry.load(ContextId(1)).await.unwrap();
        let expected = first.version();
        first
            .choose_capacity(ParticipantId(1), Capacity::Two, Uuid::new_v4(), &clock)
            .unwrap();
        second
            .choose_capacity(ParticipantId(1), Capacity::Four, Uuid::new_v4(), &clock)
            .unwrap();
        registry.commit(first, expected).await.unwrap();

        let result = registry.commit(second, expected).await;

        assert!(matches!(
            result,
            Err(GameError::ConcurrencyConflict { .. })
        ));
        let stored = registry.load(ContextId(1)).await.unwrap();
        assert_eq!(stored.capacity(), Some(Capacity::Two));
    }

    #[tokio::test]
    async fn test_commit_of_terminal_session_removes_it() {
        let registry = InMemorySessionRegistry::new();
        let clock = clock_at(10);
        registry.create(opened(ContextId(1), &clock)).await.unwrap();

        let mut session = registry.load(ContextId(1)).await.unwrap();
        let expected = session.version();
        session
            .cancel(
                ParticipantId(1),
                CancelPolicy::Participant,
                Uuid::new_v4(),
                &clock,
            )
            .unwrap();
        registry.commit(session, expected).await.unwrap();

        assert!(matches!(
            registry.load(ContextId(1)).await,
            Err(GameError::NoActiveGame(_))
        ));
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent() {
        let registry = InMemorySessionRegistry::new();
        registry
            .create(opened(ContextId(3), &clock_at(10)))
            .await
            .unwrap();

        registry.destroy(ContextId(3)).await.unwrap();
        registry.destroy(ContextId(3)).await.unwrap();

        assert_eq!(registry.active_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_idle_since_lists_only_stale_sessions() {
        let registry = InMemorySessionRegistry::new();
        registry
            .create(opened(ContextId(1), &clock_at(8)))
            .await
            .unwrap();
        registry
            .create(opened(ContextId(2), &clock_at(12)))
            .await
            .unwrap();

        let cutoff = clock_at(12).0 - Duration::hours(1);
        let idle = registry.idle_since(cutoff).await.unwrap();

        assert_eq!(idle, vec![ContextId(1)]);
    }

    #[tokio::test]
    async fn test_expire_if_idle_spares_session_touched_after_listing() {
        // Arrange
        let registry = InMemorySessionRegistry::new();
        registry
            .create(opened(ContextId(1), &clock_at(8)))
            .await
            .unwrap();
        let cutoff = clock_at(12).0 - Duration::hours(1);
        let listed = registry.idle_since(cutoff).await.unwrap();
        let mut session = registry.load(ContextId(1)).await.unwrap();
        let expected = session.version();
        session
            .choose_capacity(ParticipantId(1), Capacity::Two, Uuid::new_v4(), &clock_at(12))
            .unwrap();
        registry.commit(session, expected).await.unwrap();

        // Act
        let removed = registry.expire_if_idle(ContextId(1), cutoff).await.unwrap();

        // Assert
        assert_eq!(listed, vec![ContextId(1)]);
        assert!(!removed);
        assert_eq!(registry.active_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_expire_if_idle_removes_stale_session_once() {
        // Arrange
        let registry = InMemorySessionRegistry::new();
        registry
            .create(opened(ContextId(2), &clock_at(8)))
            .await
            .unwrap();
        let cutoff = clock_at(12).0 - Duration::hours(1);

        // Act
        let first = registry.expire_if_idle(ContextId(2), cutoff).await.unwrap();
        let second = registry.expire_if_idle(ContextId(2), cutoff).await.unwrap();

        // Assert
        assert!(first);
        assert!(!second);
        assert_eq!(registry.active_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_creates_in_one_context_admit_exactly_one() {
        let registry = Arc::new(InMemorySessionRegistry::new());
        let mut handles = Vec::new();
        for initiator in 0..16 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                let mut session =
                    GameSession::new(Uuid::new_v4(), ContextId(77), ParticipantId(initiator));
                session.open(Uuid::new_v4(), &clock_at(10)).unwrap();
                registry.create(session).await.is_ok()
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }

        assert_eq!(admitted, 1);
    }
}
