//! Commands for the Session context.

use marpele_core::command::Command;
use marpele_core::ids::{ContextId, ParticipantId};
use marpele_rules::domain::movement::Difficulty;
use marpele_rules::domain::token::Token;
use uuid::Uuid;

use super::party::Capacity;

/// Command to open a new game in a context.
#[derive(Debug, Clone)]
pub struct CreateGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The context that will host the game.
    pub context_id: ContextId,
    /// The participant starting the game.
    pub initiator_id: ParticipantId,
}

impl Command for CreateGame {
    fn command_type(&self) -> &'static str {
        "session.create_game"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn context_id(&self) -> ContextId {
        self.context_id
    }

    fn actor_id(&self) -> ParticipantId {
        self.initiator_id
    }
}

/// Command to fix the party size.
#[derive(Debug, Clone)]
pub struct ChooseCapacity {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game's context.
    pub context_id: ContextId,
    /// Who is choosing.
    pub actor_id: ParticipantId,
    /// The chosen party size.
    pub capacity: Capacity,
}

impl Command for ChooseCapacity {
    fn command_type(&self) -> &'static str {
        "session.choose_capacity"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn context_id(&self) -> ContextId {
        self.context_id
    }

    fn actor_id(&self) -> ParticipantId {
        self.actor_id
    }
}

/// Command to fix the difficulty.
#[derive(Debug, Clone)]
pub struct ChooseDifficulty {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game's context.
    pub context_id: ContextId,
    /// Who is choosing.
    pub actor_id: ParticipantId,
    /// The chosen difficulty.
    pub difficulty: Difficulty,
}

impl Command for ChooseDifficulty {
    fn command_type(&self) -> &'static str {
        "session.choose_difficulty"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn context_id(&self) -> ContextId {
        self.context_id
    }

    fn actor_id(&self) -> ParticipantId {
        self.actor_id
    }
}

/// Command to claim a token and a seat.
#[derive(Debug, Clone)]
pub struct ChooseToken {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game's context.
    pub context_id: ContextId,
    /// Who is claiming.
    pub actor_id: ParticipantId,
    /// The requested token.
    pub token: Token,
}

impl Command for ChooseToken {
    fn command_type(&self) -> &'static str {
        "session.choose_token"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn context_id(&self) -> ContextId {
        self.context_id
    }

    fn actor_id(&self) -> ParticipantId {
        self.actor_id
    }
}

/// Command to roll the die on the actor's turn.
#[derive(Debug, Clone)]
pub struct RollDice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game's context.
    pub context_id: ContextId,
    /// Who is rolling.
    pub actor_id: ParticipantId,
}

impl Command for RollDice {
    fn command_type(&self) -> &'static str {
        "session.roll_dice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn context_id(&self) -> ContextId {
        self.context_id
    }

    fn actor_id(&self) -> ParticipantId {
        self.actor_id
    }
}

/// Command to abandon the game.
#[derive(Debug, Clone)]
pub struct CancelGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game's context.
    pub context_id: ContextId,
    /// Who is cancelling.
    pub actor_id: ParticipantId,
}

impl Command for CancelGame {
    fn command_type(&self) -> &'static str {
        "session.cancel_game"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn context_id(&self) -> ContextId {
        self.context_id
    }

    fn actor_id(&self) -> ParticipantId {
        self.actor_id
    }
}
