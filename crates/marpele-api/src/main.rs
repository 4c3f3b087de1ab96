//! Marpele API server entry point.

use std::sync::{Arc, Mutex};

use marpele_api::config::Settings;
use marpele_api::error::AppError;
use marpele_api::state::AppState;
use marpele_api::{routes, sweeper, telemetry};
use marpele_core::clock::{Clock, SystemClock};
use marpele_core::rng::{DeterministicRng, SystemRng};
use marpele_rules::domain::board::Board;
use marpele_rules::domain::render::TextBoardRenderer;
use marpele_session::infrastructure::memory_registry::InMemorySessionRegistry;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let tracer_provider = telemetry::init_tracing()?;

    tracing::info!("Starting Marpele API server");

    let settings = Settings::from_env()?;
    let addr = settings.addr()?;
    tracing::info!(
        cancel_policy = ?settings.game.cancel_policy,
        idle_timeout_secs = settings.game.idle_timeout_secs,
        "loaded settings"
    );

    // Build application state.
    let clock: Arc<dyn Clock + Send + Sync> = Arc::new(SystemClock);
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> =
        Arc::new(Mutex::new(SystemRng::from_entropy()));
    let app_state = AppState::new(
        clock,
        rng,
        Arc::new(InMemorySessionRegistry::new()),
        Arc::new(Board::standard()),
        Arc::new(TextBoardRenderer),
        settings.game.clone(),
    );

    let _sweeper = sweeper::spawn_idle_sweeper(app_state.clone());

    let app = routes::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    if let Some(provider) = tracer_provider {
        provider
            .shutdown()
            .map_err(|e| AppError::Telemetry(format!("failed to flush spans: {e}")))?;
    }

    Ok(())
}
