//! HTTP routes.

pub mod games;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Assembles the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/games", games::router())
        .with_state(state)
}
