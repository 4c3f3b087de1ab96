//! Domain events for the Session context.

use marpele_core::event::{DomainEvent, EventMetadata};
use marpele_core::ids::{ContextId, ParticipantId};
use marpele_rules::domain::board::Jump;
use marpele_rules::domain::movement::Difficulty;
use marpele_rules::domain::token::Token;
use serde::{Deserialize, Serialize};

use super::party::Capacity;

/// Emitted when a game is opened in a context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCreated {
    /// The hosting context.
    pub context_id: ContextId,
    /// Who opened the game.
    pub initiator: ParticipantId,
}

/// Emitted when the party size is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityChosen {
    /// The chosen party size.
    pub capacity: Capacity,
    /// Who chose it.
    pub chosen_by: ParticipantId,
}

/// Emitted when the difficulty is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyChosen {
    /// The chosen difficulty.
    pub difficulty: Difficulty,
    /// Who chose it.
    pub chosen_by: ParticipantId,
}

/// Emitted when a participant claims a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenChosen {
    /// The participant.
    pub participant: ParticipantId,
    /// The claimed token.
    pub token: Token,
    /// The participant's seat (turn order index).
    pub seat: usize,
}

/// Emitted when the last seat is filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStarted {
    /// Participants in turn order.
    pub turn_order: Vec<ParticipantId>,
}

/// Emitted for every accepted roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiceRolled {
    /// Who rolled.
    pub participant: ParticipantId,
    /// The face rolled.
    pub face: u8,
    /// Cell before the roll.
    pub from: u8,
    /// Cell after the roll.
    pub to: u8,
    /// A hard-mode entry attempt without a six.
    pub entry_denied: bool,
    /// The roll would have passed the goal.
    pub overshoot: bool,
    /// Ladders and snakes taken.
    pub jumps: Vec<Jump>,
    /// Whose turn it is next; `None` when this roll won the game.
    pub next_turn: Option<ParticipantId>,
}

/// Emitted when a participant reaches the goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameWon {
    /// The winner.
    pub winner: ParticipantId,
    /// The winner's token.
    pub token: Token,
}

/// Emitted when a game is abandoned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCancelled {
    /// Who cancelled.
    pub cancelled_by: ParticipantId,
}

/// Event type identifier for [`SessionCreated`].
pub const SESSION_CREATED_EVENT_TYPE: &str = "session.created";

/// Event type identifier for [`CapacityChosen`].
pub const CAPACITY_CHOSEN_EVENT_TYPE: &str = "session.capacity_chosen";

/// Event type identifier for [`DifficultyChosen`].
pub const DIFFICULTY_CHOSEN_EVENT_TYPE: &str = "session.difficulty_chosen";

/// Event type identifier for [`TokenChosen`].
pub const TOKEN_CHOSEN_EVENT_TYPE: &str = "session.token_chosen";

/// Event type identifier for [`GameStarted`].
pub const GAME_STARTED_EVENT_TYPE: &str = "session.game_started";

/// Event type identifier for [`DiceRolled`].
pub const DICE_ROLLED_EVENT_TYPE: &str = "session.dice_rolled";

/// Event type identifier for [`GameWon`].
pub const GAME_WON_EVENT_TYPE: &str = "session.game_won";

/// Event type identifier for [`SessionCancelled`].
pub const SESSION_CANCELLED_EVENT_TYPE: &str = "session.cancelled";

/// Event payload variants for the Session context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEventKind {
    /// A game was opened.
    SessionCreated(SessionCreated),
    /// The party size was fixed.
    CapacityChosen(CapacityChosen),
    /// The difficulty was fixed.
    DifficultyChosen(DifficultyChosen),
    /// A token was claimed.
    TokenChosen(TokenChosen),
    /// Play began.
    GameStarted(GameStarted),
    /// A die was rolled.
    DiceRolled(DiceRolled),
    /// Someone won.
    GameWon(GameWon),
    /// The game was abandoned.
    SessionCancelled(SessionCancelled),
}

impl SessionEventKind {
    /// The routing name of this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SessionCreated(_) => SESSION_CREATED_EVENT_TYPE,
            Self::CapacityChosen(_) => CAPACITY_CHOSEN_EVENT_TYPE,
            Self::DifficultyChosen(_) => DIFFICULTY_CHOSEN_EVENT_TYPE,
            Self::TokenChosen(_) => TOKEN_CHOSEN_EVENT_TYPE,
            Self::GameStarted(_) => GAME_STARTED_EVENT_TYPE,
            Self::DiceRolled(_) => DICE_ROLLED_EVENT_TYPE,
            Self::GameWon(_) => GAME_WON_EVENT_TYPE,
            Self::SessionCancelled(_) => SESSION_CANCELLED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the Session context.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: SessionEventKind,
}

impl DomainEvent for SessionEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("SessionEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
