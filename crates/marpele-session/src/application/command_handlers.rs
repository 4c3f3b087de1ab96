//! Command handlers for the Session context.
//!
//! Each handler loads the context's session, runs one domain method, and
//! commits the result at the version it was loaded with.

use std::sync::Mutex;

use marpele_core::aggregate::AggregateRoot;
use marpele_core::clock::Clock;
use marpele_core::command::Command;
use marpele_core::error::GameError;
use marpele_core::event::DomainEvent;
use marpele_core::ids::{ContextId, ParticipantId};
use marpele_core::rng::DeterministicRng;
use marpele_rules::domain::board::{Board, Jump};
use marpele_rules::domain::render::BoardRenderer;
use marpele_rules::domain::token::Token;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::application::query_handlers::{RenderedBoard, SessionView, render_session};
use crate::domain::aggregates::GameSession;
use crate::domain::commands::{
    CancelGame, ChooseCapacity, ChooseDifficulty, ChooseToken, CreateGame, RollDice,
};
use crate::domain::events::{DiceRolled, SessionEvent};
use crate::domain::party::CancelPolicy;
use crate::domain::registry::SessionRegistry;

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct SessionCommandResult<T> {
    /// The context the command targeted.
    pub context_id: ContextId,
    /// The game the command affected.
    pub game_id: Uuid,
    /// What the caller gets back.
    pub outcome: T,
    /// Events produced and committed.
    pub events: Vec<SessionEvent>,
}

/// The full result of one roll, ready for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveOutcome {
    /// Who rolled.
    pub mover: ParticipantId,
    /// The mover's token.
    pub mover_token: Option<Token>,
    /// The face rolled.
    pub dice_value: u8,
    /// Cell before the roll.
    pub from_position: u8,
    /// Cell after the roll.
    pub to_position: u8,
    /// Hard mode refused entry for want of a six.
    pub entry_denied: bool,
    /// The roll would have passed the goal.
    pub overshoot: bool,
    /// Ladders and snakes taken, in order.
    pub jumps: Vec<Jump>,
    /// Whose turn it is now; `None` once the game is over.
    pub next_turn_holder: Option<ParticipantId>,
    /// The roll ended the game.
    pub game_over: bool,
    /// The winner, if the game is over.
    pub winner: Option<ParticipantId>,
    /// The winner's token, if the game is over.
    pub winner_token: Option<Token>,
    /// The session right after the roll.
    pub session: SessionView,
    /// The final board, rendered once someone wins.
    #[serde(skip)]
    pub final_board: Option<RenderedBoard>,
}

impl MoveOutcome {
    fn new(rolled: DiceRolled, session: &GameSession, final_board: Option<RenderedBoard>) -> Self {
        let winner = session.winner();
        Self {
            mover: rolled.participant,
            mover_token: session.token_of(rolled.participant),
            dice_value: rolled.face,
            from_position: rolled.from,
            to_position: rolled.to,
            entry_denied: rolled.entry_denied,
            overshoot: rolled.overshoot,
            jumps: rolled.jumps,
            next_turn_holder: rolled.next_turn,
            game_over: winner.is_some(),
            winner,
            winner_token: winner.and_then(|w| session.token_of(w)),
            session: SessionView::from(session),
            final_board,
        }
    }
}

/// Confirmation that a game was abandoned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cancellation {
    /// The freed context.
    pub context_id: ContextId,
    /// The abandoned game.
    pub game_id: Uuid,
    /// Who cancelled.
    pub cancelled_by: ParticipantId,
}

fn log_events(events: &[SessionEvent]) {
    for event in events {
        let meta = event.metadata();
        debug!(
            event_type = event.event_type(),
            game_id = %meta.aggregate_id,
            sequence_number = meta.sequence_number,
            correlation_id = %meta.correlation_id,
            payload = %event.to_payload(),
            "session event"
        );
    }
}

fn log_command(command: &dyn Command) {
    debug!(
        command_type = command.command_type(),
        context_id = %command.context_id(),
        actor_id = %command.actor_id(),
        correlation_id = %command.correlation_id(),
        "handling command"
    );
}

/// Loads the session the command targets.
async fn load_target(
    command: &dyn Command,
    registry: &dyn SessionRegistry,
) -> Result<GameSession, GameError> {
    log_command(command);
    registry.load(command.context_id()).await
}

/// Drains the session's new events and commits it at `expected_version`.
async fn commit(
    mut session: GameSession,
    expected_version: i64,
    registry: &dyn SessionRegistry,
) -> Result<(GameSession, Vec<SessionEvent>), GameError> {
    let events = session.take_uncommitted_events();
    registry.commit(session.clone(), expected_version).await?;
    debug!(
        game_id = %session.aggregate_id(),
        version = session.version(),
        "committed session"
    );
    log_events(&events);
    Ok((session, events))
}

/// Handles the `CreateGame` command: opens a session with the initiator
/// seated and registers it.
///
/// # Errors
///
/// Returns `GameError::AlreadyActive` if the context already hosts a game.
pub async fn handle_create_game(
    command: &CreateGame,
    clock: &dyn Clock,
    registry: &dyn SessionRegistry,
) -> Result<SessionCommandResult<SessionView>, GameError> {
    log_command(command);
    let mut session = GameSession::new(Uuid::new_v4(), command.context_id(), command.actor_id());
    session.open(command.correlation_id, clock)?;

    let events = session.take_uncommitted_events();
    let view = SessionView::from(&session);
    registry.create(session).await?;
    log_events(&events);

    Ok(SessionCommandResult {
        context_id: command.context_id,
        game_id: view.game_id,
        outcome: view,
        events,
    })
}

/// Handles the `ChooseCapacity` command.
///
/// # Errors
///
/// Returns `GameError::NoActiveGame`, `GameError::InvalidPhase`,
/// `GameError::NotParticipant`, or `GameError::ConcurrencyConflict`.
pub async fn handle_choose_capacity(
    command: &ChooseCapacity,
    clock: &dyn Clock,
    registry: &dyn SessionRegistry,
) -> Result<SessionCommandResult<SessionView>, GameError> {
    let mut session = load_target(command, registry).await?;
    let expected_version = session.version();

    session.choose_capacity(
        command.actor_id,
        command.capacity,
        command.correlation_id,
        clock,
    )?;

    let (session, events) = commit(session, expected_version, registry).await?;
    Ok(SessionCommandResult {
        context_id: command.context_id,
        game_id: session.id,
        outcome: SessionView::from(&session),
        events,
    })
}

/// Handles the `ChooseDifficulty` command.
///
/// # Errors
///
/// Returns `GameError::NoActiveGame`, `GameError::InvalidPhase`,
/// `GameError::NotParticipant`, or `GameError::ConcurrencyConflict`.
pub async fn handle_choose_difficulty(
    command: &ChooseDifficulty,
    clock: &dyn Clock,
    registry: &dyn SessionRegistry,
) -> Result<SessionCommandResult<SessionView>, GameError> {
    let mut session = load_target(command, registry).await?;
    let expected_version = session.version();

    session.choose_difficulty(
        command.actor_id,
        command.difficulty,
        command.correlation_id,
        clock,
    )?;

    let (session, events) = commit(session, expected_version, registry).await?;
    Ok(SessionCommandResult {
        context_id: command.context_id,
        game_id: session.id,
        outcome: SessionView::from(&session),
        events,
    })
}

/// Handles the `ChooseToken` command. Filling the last seat starts the game.
///
/// # Errors
///
/// Returns `GameError::NoActiveGame`, `GameError::InvalidPhase`,
/// `GameError::Validation`, `GameError::TokenTaken`,
/// `GameError::AlreadySelected`, `GameError::SessionFull`, or
/// `GameError::ConcurrencyConflict`.
pub async fn handle_choose_token(
    command: &ChooseToken,
    clock: &dyn Clock,
    registry: &dyn SessionRegistry,
) -> Result<SessionCommandResult<SessionView>, GameError> {
    let mut session = load_target(command, registry).await?;
    let expected_version = session.version();

    session.choose_token(
        command.actor_id,
        command.token,
        command.correlation_id,
        clock,
    )?;

    let (session, events) = commit(session, expected_version, registry).await?;
    Ok(SessionCommandResult {
        context_id: command.context_id,
        game_id: session.id,
        outcome: SessionView::from(&session),
        events,
    })
}

/// Handles the `RollDice` command. A winning roll ends the game, frees the
/// context, and carries a rendering of the final board.
///
/// The `Mutex` is locked only around the synchronous domain call.
///
/// # Errors
///
/// Returns `GameError::NoActiveGame`, `GameError::InvalidPhase`,
/// `GameError::NotYourTurn`, `GameError::ConcurrencyConflict`, or
/// `GameError::Infrastructure` if the RNG or the renderer is unusable.
pub async fn handle_roll_dice(
    command: &RollDice,
    board: &Board,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    renderer: &dyn BoardRenderer,
    registry: &dyn SessionRegistry,
) -> Result<SessionCommandResult<MoveOutcome>, GameError> {
    let mut session = load_target(command, registry).await?;
    let expected_version = session.version();

    let rolled = {
        let mut rng_guard = rng
            .lock()
            .map_err(|e| GameError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
        session.roll_dice(
            command.actor_id,
            board,
            command.correlation_id,
            clock,
            &mut *rng_guard,
        )?
    };

    let (session, events) = commit(session, expected_version, registry).await?;
    let final_board = session
        .winner()
        .map(|_| render_session(&session, board, renderer))
        .transpose()?;
    Ok(SessionCommandResult {
        context_id: command.context_id,
        game_id: session.id,
        outcome: MoveOutcome::new(rolled, &session, final_board),
        events,
    })
}

/// Handles the `CancelGame` command, freeing the context.
///
/// # Errors
///
/// Returns `GameError::NoActiveGame`, `GameError::NotInitiator`,
/// `GameError::NotParticipant`, or `GameError::ConcurrencyConflict`.
pub async fn handle_cancel_game(
    command: &CancelGame,
    policy: CancelPolicy,
    clock: &dyn Clock,
    registry: &dyn SessionRegistry,
) -> Result<SessionCommandResult<Cancellation>, GameError> {
    let mut session = load_target(command, registry).await?;
    let expected_version = session.version();

    session.cancel(command.actor_id, policy, command.correlation_id, clock)?;

    let (session, events) = commit(session, expected_version, registry).await?;
    Ok(SessionCommandResult {
        context_id: command.context_id,
        game_id: session.id,
        outcome: Cancellation {
            context_id: command.context_id,
            game_id: session.id,
            cancelled_by: command.actor_id,
        },
        events,
    })
}
