//! Query handlers for the Session context.
//!
//! Read-only views handed to the transport layer, plus board rendering.

use marpele_core::aggregate::AggregateRoot;
use marpele_core::error::GameError;
use marpele_core::ids::{ContextId, ParticipantId};
use marpele_rules::domain::board::Board;
use marpele_rules::domain::movement::Difficulty;
use marpele_rules::domain::render::{BoardRenderer, BoardSnapshot};
use marpele_rules::domain::token::Token;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::GameSession;
use crate::domain::party::{Capacity, Phase};
use crate::domain::registry::SessionRegistry;

/// Read-only view of one seated participant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantView {
    /// The participant.
    pub participant_id: ParticipantId,
    /// Turn order index.
    pub seat: usize,
    /// Claimed token, if any.
    pub token: Option<Token>,
    /// The token's emoji, if any.
    pub symbol: Option<&'static str>,
    /// Current cell.
    pub position: u8,
}

/// Read-only view of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    /// The hosting context.
    pub context_id: ContextId,
    /// The game's aggregate identifier.
    pub game_id: Uuid,
    /// Who opened the game.
    pub initiator: ParticipantId,
    /// Current negotiation phase.
    pub phase: Phase,
    /// Party size, once chosen.
    pub capacity: Option<Capacity>,
    /// Difficulty, once chosen.
    pub difficulty: Option<Difficulty>,
    /// Seated participants in turn order.
    pub participants: Vec<ParticipantView>,
    /// Whose turn it is, while active.
    pub turn_holder: Option<ParticipantId>,
    /// Tokens still up for grabs.
    pub available_tokens: Vec<Token>,
    /// The winner, once decided.
    pub winner: Option<ParticipantId>,
    /// Current version (event count).
    pub version: i64,
}

impl From<&GameSession> for SessionView {
    fn from(session: &GameSession) -> Self {
        let participants = session
            .participants()
            .iter()
            .enumerate()
            .map(|(seat, &participant_id)| {
                let token = session.token_of(participant_id);
                ParticipantView {
                    participant_id,
                    seat,
                    token,
                    symbol: token.map(Token::symbol),
                    position: session.position_of(participant_id).unwrap_or(0),
                }
            })
            .collect();

        Self {
            context_id: session.context_id,
            game_id: session.id,
            initiator: session.initiator,
            phase: session.phase(),
            capacity: session.capacity(),
            difficulty: session.difficulty(),
            participants,
            turn_holder: session.turn_holder(),
            available_tokens: session.available_tokens(),
            winner: session.winner(),
            version: session.version(),
        }
    }
}

/// A rendered board image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBoard {
    /// MIME type of `bytes`.
    pub content_type: &'static str,
    /// The rendering.
    pub bytes: Vec<u8>,
}

/// Retrieves the session hosted by a context.
///
/// # Errors
///
/// Returns `GameError::NoActiveGame` if the context hosts no game.
pub async fn get_session_view(
    context_id: ContextId,
    registry: &dyn SessionRegistry,
) -> Result<SessionView, GameError> {
    let session = registry.load(context_id).await?;
    Ok(SessionView::from(&session))
}

/// Draws the current board of a context's game.
///
/// # Errors
///
/// Returns `GameError::NoActiveGame` if the context hosts no game and
/// whatever the renderer reports on failure.
pub async fn render_board(
    context_id: ContextId,
    board: &Board,
    renderer: &dyn BoardRenderer,
    registry: &dyn SessionRegistry,
) -> Result<RenderedBoard, GameError> {
    let session = registry.load(context_id).await?;
    render_session(&session, board, renderer)
}

/// Draws the pieces of `session` as they stand, whether or not it is still
/// registered.
///
/// # Errors
///
/// Returns whatever the renderer reports on failure.
pub fn render_session(
    session: &GameSession,
    board: &Board,
    renderer: &dyn BoardRenderer,
) -> Result<RenderedBoard, GameError> {
    let snapshot = BoardSnapshot {
        board,
        pieces: session.pieces(),
    };
    Ok(RenderedBoard {
        content_type: renderer.content_type(),
        bytes: renderer.render(&snapshot)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use marpele_core::error::GameError;
    use marpele_core::ids::{ContextId, ParticipantId};
    use marpele_rules::domain::board::Board;
    use marpele_rules::domain::render::TextBoardRenderer;
    use marpele_test_support::FixedClock;
    use uuid::Uuid;

    use crate::application::query_handlers::{get_session_view, render_board};
    use crate::domain::aggregates::GameSession;
    use crate::domain::party::Phase;
    use crate::domain::registry::SessionRegistry;
    use crate::infrastructure::memory_registry::InMemorySessionRegistry;

    async fn registry_with_game(context_id: ContextId) -> InMemorySessionRegistry {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
        let registry = InMemorySessionRegistry::new();
        let mut session = GameSession::new(Uuid::new_v4(), context_id, ParticipantId(5));
        session.open(Uuid::new_v4(), &clock).unwrap();
        registry.create(session).await.unwrap();
        registry
    }

    #[tokio::test]
    async fn test_get_session_view_returns_view_with_state() {
        // Arrange
        let context_id = ContextId(-42);
        let registry = registry_with_game(context_id).await;

        // Act
        let view = get_session_view(context_id, &registry).await.unwrap();

        // Assert
        assert_eq!(view.context_id, context_id);
        assert_eq!(view.phase, Phase::SelectMode);
        assert_eq!(view.participants.len(), 1);
        assert_eq!(view.participants[0].participant_id, ParticipantId(5));
        assert_eq!(view.participants[0].token, None);
        assert!(view.available_tokens.is_empty());
        assert_eq!(view.version, 1);
    }

    #[tokio::test]
    async fn test_get_session_view_returns_no_active_game_when_absent() {
        // Arrange
        let registry = InMemorySessionRegistry::new();

        // Act
        let result = get_session_view(ContextId(1), &registry).await;

        // Assert
        match result.unwrap_err() {
            GameError::NoActiveGame(id) => assert_eq!(id, ContextId(1)),
            other => panic!("expected NoActiveGame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_render_board_uses_renderer_content_type() {
        // Arrange
        let context_id = ContextId(8);
        let registry = registry_with_game(context_id).await;

        // Act
        let rendered = render_board(
            context_id,
            &Board::standard(),
            &TextBoardRenderer,
            &registry,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(rendered.content_type, "text/plain; charset=utf-8");
        let text = String::from_utf8(rendered.bytes).unwrap();
        assert_eq!(text.lines().count(), 10);
    }
}
