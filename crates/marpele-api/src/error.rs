//! Marpele — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use marpele_core::error::GameError;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable or the YAML settings file is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The span exporter could not be built.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `GameError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub GameError);

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            GameError::NoActiveGame(_) => (StatusCode::NOT_FOUND, "no_active_game"),
            GameError::AlreadyActive(_) => (StatusCode::CONFLICT, "already_active"),
            GameError::InvalidPhase { .. } => (StatusCode::CONFLICT, "invalid_phase"),
            GameError::TokenTaken(_) => (StatusCode::CONFLICT, "token_taken"),
            GameError::AlreadySelected(_) => (StatusCode::CONFLICT, "already_selected"),
            GameError::SessionFull { .. } => (StatusCode::CONFLICT, "session_full"),
            GameError::ConcurrencyConflict { .. } => {
                (StatusCode::CONFLICT, "concurrency_conflict")
            }
            GameError::NotYourTurn { .. } => (StatusCode::FORBIDDEN, "not_your_turn"),
            GameError::NotParticipant(_) => (StatusCode::FORBIDDEN, "not_participant"),
            GameError::NotInitiator(_) => (StatusCode::FORBIDDEN, "not_initiator"),
            GameError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            GameError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();
        let message = self.0.to_string();

        if status.is_server_error() {
            error!(error = error_code, %message, "request failed");
        } else {
            debug!(error = error_code, %message, "request rejected");
        }

        let body = ErrorBody {
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}
