//! Integration tests for the health endpoint.

mod common;

use axum::http::StatusCode;
use marpele_test_support::SequenceRng;

#[tokio::test]
async fn test_health_returns_200_with_active_game_count() {
    let app = common::build_test_app(SequenceRng::new(vec![]));

    let (status, json) = common::get_json(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["active_games"], 0);

    common::post_json(
        app.clone(),
        "/api/v1/games/12",
        &serde_json::json!({ "initiator_id": 1 }),
    )
    .await;
    let (_, json) = common::get_json(app, "/health").await;
    assert_eq!(json["active_games"], 1);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = common::build_test_app(SequenceRng::new(vec![]));

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/v1/nonexistent/route/here")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
