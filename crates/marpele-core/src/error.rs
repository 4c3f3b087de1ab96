//! Domain error types.
//!
//! Every variant is recoverable by the caller: a rejected action leaves the
//! session exactly as it was.

use thiserror::Error;

use crate::ids::{ContextId, ParticipantId};

/// Top-level game error type.
#[derive(Debug, Error)]
pub enum GameError {
    /// A game is already running in this context.
    #[error("a game is already active in context {0}")]
    AlreadyActive(ContextId),

    /// No game is running in this context.
    #[error("no active game in context {0}")]
    NoActiveGame(ContextId),

    /// The action does not match the current negotiation phase.
    #[error("{action} is not allowed while the game is in phase {phase}")]
    InvalidPhase {
        /// The rejected action.
        action: &'static str,
        /// The phase the session was in.
        phase: String,
    },

    /// The actor tried to roll out of turn.
    #[error("participant {actor} cannot roll: it is {expected}'s turn")]
    NotYourTurn {
        /// The participant who tried to roll.
        actor: ParticipantId,
        /// The participant whose turn it is.
        expected: ParticipantId,
    },

    /// The requested token already belongs to another participant.
    #[error("token {0} is already taken")]
    TokenTaken(String),

    /// The actor already holds a token.
    #[error("participant {0} has already selected a token")]
    AlreadySelected(ParticipantId),

    /// The actor is not part of the session.
    #[error("participant {0} is not part of this game")]
    NotParticipant(ParticipantId),

    /// Only the initiator may perform this action.
    #[error("participant {0} did not start this game")]
    NotInitiator(ParticipantId),

    /// Every seat is already taken.
    #[error("all {capacity} seats are taken")]
    SessionFull {
        /// The chosen party size.
        capacity: usize,
    },

    /// Input failed domain validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// The session changed between load and commit.
    #[error(
        "concurrency conflict in context {context_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        /// The context that had the conflict.
        context_id: ContextId,
        /// The expected version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// An infrastructure failure (poisoned lock, renderer failure, ...).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
