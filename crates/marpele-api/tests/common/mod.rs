//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use marpele_core::clock::Clock;
use marpele_core::rng::DeterministicRng;
use marpele_rules::domain::board::Board;
use marpele_rules::domain::render::TextBoardRenderer;
use marpele_session::domain::party::CancelPolicy;
use marpele_session::infrastructure::memory_registry::InMemorySessionRegistry;
use marpele_test_support::{FixedClock, SequenceRng};
use tower::ServiceExt;

use marpele_api::config::GameSettings;
use marpele_api::routes;
use marpele_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock + Send + Sync> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router with an empty registry and scripted dice.
/// Uses the same route structure as `main.rs`.
pub fn build_test_app(rng: SequenceRng) -> Router {
    build_test_app_with_policy(rng, CancelPolicy::default())
}

/// Like [`build_test_app`] but with a specific cancellation policy.
pub fn build_test_app_with_policy(rng: SequenceRng, cancel_policy: CancelPolicy) -> Router {
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(rng));
    let settings = GameSettings {
        cancel_policy,
        ..GameSettings::default()
    };
    let app_state = AppState::new(
        fixed_clock(),
        rng,
        Arc::new(InMemorySessionRegistry::new()),
        Arc::new(Board::standard()),
        Arc::new(TextBoardRenderer),
        settings,
    );
    routes::app(app_state)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the body as text.
pub async fn get_text(app: Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, String::from_utf8(body_bytes.to_vec()).unwrap())
}

/// Open a two-player game in `context` with participants 1 and 2 seated as
/// butterfly and octopus.
pub async fn start_pair(app: &Router, context: i64, difficulty: &str) {
    let base = format!("/api/v1/games/{context}");
    let steps = [
        (base.clone(), serde_json::json!({ "initiator_id": 1 })),
        (
            format!("{base}/capacity"),
            serde_json::json!({ "actor_id": 1, "capacity": 2 }),
        ),
        (
            format!("{base}/difficulty"),
            serde_json::json!({ "actor_id": 1, "difficulty": difficulty }),
        ),
        (
            format!("{base}/token"),
            serde_json::json!({ "actor_id": 1, "token": "butterfly" }),
        ),
        (
            format!("{base}/token"),
            serde_json::json!({ "actor_id": 2, "token": "octopus" }),
        ),
    ];
    for (uri, body) in steps {
        let (status, json) = post_json(app.clone(), &uri, &body).await;
        assert!(status.is_success(), "{uri} failed: {json}");
    }
}
