//! Routes for game sessions, one per context.

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use marpele_core::ids::{ContextId, ParticipantId};
use marpele_rules::domain::movement::Difficulty;
use marpele_rules::domain::token::Token;
use marpele_session::application::command_handlers::{self, MoveOutcome};
use marpele_session::application::query_handlers::{self, SessionView};
use marpele_session::domain::commands;
use marpele_session::domain::party::Capacity;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /{context_id}.
#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    /// The participant starting the game.
    pub initiator_id: ParticipantId,
}

/// Request body for POST /{context_id}/capacity.
#[derive(Debug, Deserialize)]
pub struct ChooseCapacityRequest {
    /// Who is choosing.
    pub actor_id: ParticipantId,
    /// Party size; only 2 and 4 are accepted.
    pub capacity: u8,
}

/// Request body for POST /{context_id}/difficulty.
#[derive(Debug, Deserialize)]
pub struct ChooseDifficultyRequest {
    /// Who is choosing.
    pub actor_id: ParticipantId,
    /// `"easy"` or `"hard"`.
    pub difficulty: Difficulty,
}

/// Request body for POST /{context_id}/token.
#[derive(Debug, Deserialize)]
pub struct ChooseTokenRequest {
    /// Who is choosing.
    pub actor_id: ParticipantId,
    /// The token to claim.
    pub token: Token,
}

/// Request body for actions that only need the actor.
#[derive(Debug, Deserialize)]
pub struct ActorRequest {
    /// Who is acting.
    pub actor_id: ParticipantId,
}

/// Response body for POST /{context_id}/cancel.
#[derive(Debug, Serialize)]
pub struct CancelResponse {
    /// Always `true`.
    pub cancelled: bool,
    /// The freed context.
    pub context_id: ContextId,
    /// The abandoned game.
    pub game_id: Uuid,
    /// Who cancelled.
    pub cancelled_by: ParticipantId,
}

/// Response body for POST /{context_id}/roll.
#[derive(Debug, Serialize)]
pub struct RollResponse {
    /// The move and the session after it.
    #[serde(flatten)]
    pub outcome: MoveOutcome,
    /// The final board, present only on a winning roll and only when the
    /// renderer produces text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_board: Option<String>,
}

/// POST /{context_id}
#[instrument(skip(state, request), fields(context_id = %context_id, initiator_id = %request.initiator_id))]
async fn create_game(
    State(state): State<AppState>,
    Path(context_id): Path<ContextId>,
    Json(request): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let command = commands::CreateGame {
        correlation_id: Uuid::new_v4(),
        context_id,
        initiator_id: request.initiator_id,
    };

    info!(correlation_id = %command.correlation_id, "handling create_game command");

    let result = command_handlers::handle_create_game(
        &command,
        state.clock.as_ref(),
        state.registry.as_ref(),
    )
    .await?;

    info!(game_id = %result.game_id, "game created");

    Ok((StatusCode::CREATED, Json(result.outcome)))
}

/// POST /{context_id}/capacity
#[instrument(skip(state, request), fields(context_id = %context_id, actor_id = %request.actor_id))]
async fn choose_capacity(
    State(state): State<AppState>,
    Path(context_id): Path<ContextId>,
    Json(request): Json<ChooseCapacityRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let command = commands::ChooseCapacity {
        correlation_id: Uuid::new_v4(),
        context_id,
        actor_id: request.actor_id,
        capacity: Capacity::try_from(request.capacity)?,
    };

    info!(correlation_id = %command.correlation_id, "handling choose_capacity command");

    let result = command_handlers::handle_choose_capacity(
        &command,
        state.clock.as_ref(),
        state.registry.as_ref(),
    )
    .await?;

    Ok(Json(result.outcome))
}

/// POST /{context_id}/difficulty
#[instrument(skip(state, request), fields(context_id = %context_id, actor_id = %request.actor_id))]
async fn choose_difficulty(
    State(state): State<AppState>,
    Path(context_id): Path<ContextId>,
    Json(request): Json<ChooseDifficultyRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let command = commands::ChooseDifficulty {
        correlation_id: Uuid::new_v4(),
        context_id,
        actor_id: request.actor_id,
        difficulty: request.difficulty,
    };

    info!(correlation_id = %command.correlation_id, "handling choose_difficulty command");

    let result = command_handlers::handle_choose_difficulty(
        &command,
        state.clock.as_ref(),
        state.registry.as_ref(),
    )
    .await?;

    Ok(Json(result.outcome))
}

/// POST /{context_id}/token
#[instrument(skip(state, request), fields(context_id = %context_id, actor_id = %request.actor_id))]
async fn choose_token(
    State(state): State<AppState>,
    Path(context_id): Path<ContextId>,
    Json(request): Json<ChooseTokenRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let command = commands::ChooseToken {
        correlation_id: Uuid::new_v4(),
        context_id,
        actor_id: request.actor_id,
        token: request.token,
    };

    info!(correlation_id = %command.correlation_id, "handling choose_token command");

    let result = command_handlers::handle_choose_token(
        &command,
        state.clock.as_ref(),
        state.registry.as_ref(),
    )
    .await?;

    if result.outcome.turn_holder.is_some() {
        info!(game_id = %result.game_id, "all seats filled, game started");
    }

    Ok(Json(result.outcome))
}

/// POST /{context_id}/roll
#[instrument(skip(state, request), fields(context_id = %context_id, actor_id = %request.actor_id))]
async fn roll_dice(
    State(state): State<AppState>,
    Path(context_id): Path<ContextId>,
    Json(request): Json<ActorRequest>,
) -> Result<Json<RollResponse>, ApiError> {
    let command = commands::RollDice {
        correlation_id: Uuid::new_v4(),
        context_id,
        actor_id: request.actor_id,
    };

    info!(correlation_id = %command.correlation_id, "handling roll_dice command");

    let result = command_handlers::handle_roll_dice(
        &command,
        &state.board,
        state.clock.as_ref(),
        &state.rng,
        state.renderer.as_ref(),
        state.registry.as_ref(),
    )
    .await?;

    let outcome = result.outcome;
    if let Some(winner) = outcome.winner {
        info!(game_id = %result.game_id, %winner, "game won");
    }

    let final_board = outcome
        .final_board
        .as_ref()
        .filter(|rendered| rendered.content_type.starts_with("text/"))
        .map(|rendered| String::from_utf8_lossy(&rendered.bytes).into_owned());
    Ok(Json(RollResponse {
        outcome,
        final_board,
    }))
}

/// POST /{context_id}/cancel
#[instrument(skip(state, request), fields(context_id = %context_id, actor_id = %request.actor_id))]
async fn cancel_game(
    State(state): State<AppState>,
    Path(context_id): Path<ContextId>,
    Json(request): Json<ActorRequest>,
) -> Result<Json<CancelResponse>, ApiError> {
    let command = commands::CancelGame {
        correlation_id: Uuid::new_v4(),
        context_id,
        actor_id: request.actor_id,
    };

    info!(correlation_id = %command.correlation_id, "handling cancel_game command");

    let result = command_handlers::handle_cancel_game(
        &command,
        state.settings.cancel_policy,
        state.clock.as_ref(),
        state.registry.as_ref(),
    )
    .await?;

    info!(game_id = %result.game_id, "game cancelled");

    let cancellation = result.outcome;
    Ok(Json(CancelResponse {
        cancelled: true,
        context_id: cancellation.context_id,
        game_id: cancellation.game_id,
        cancelled_by: cancellation.cancelled_by,
    }))
}

/// GET /{context_id}
#[instrument(skip(state), fields(context_id = %context_id))]
async fn get_game(
    State(state): State<AppState>,
    Path(context_id): Path<ContextId>,
) -> Result<Json<SessionView>, ApiError> {
    let view = query_handlers::get_session_view(context_id, state.registry.as_ref()).await?;
    Ok(Json(view))
}

/// GET /{context_id}/board
#[instrument(skip(state), fields(context_id = %context_id))]
async fn get_board(
    State(state): State<AppState>,
    Path(context_id): Path<ContextId>,
) -> Result<impl IntoResponse, ApiError> {
    let rendered = query_handlers::render_board(
        context_id,
        &state.board,
        state.renderer.as_ref(),
        state.registry.as_ref(),
    )
    .await?;
    Ok(([(header::CONTENT_TYPE, rendered.content_type)], rendered.bytes))
}

/// Returns the router for game sessions.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{context_id}", post(create_game).get(get_game))
        .route("/{context_id}/capacity", post(choose_capacity))
        .route("/{context_id}/difficulty", post(choose_difficulty))
        .route("/{context_id}/token", post(choose_token))
        .route("/{context_id}/roll", post(roll_dice))
        .route("/{context_id}/cancel", post(cancel_game))
        .route("/{context_id}/board", get(get_board))
}
