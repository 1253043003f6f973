//! Integration tests for the HTTP API

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use gestalert::config::EngineConfig;
use gestalert::core::create_router;
use gestalert::core::hand::synthetic_hand;
use gestalert::types::KeypointFrame;
use serde_json::Value;
use tower::ServiceExt;

fn create_test_router() -> axum::Router {
    create_router(EngineConfig::default())
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn new_session(app: &axum::Router) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/session/new")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    json["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_router();
    let (status, json) = send(&app, Request::builder().uri("/health").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_statuses_table() {
    let app = create_test_router();
    let (status, json) = send(&app, Request::builder().uri("/statuses").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 7);
    let help = rows.iter().find(|r| r["status"] == "HELP_CRITICAL").unwrap();
    assert_eq!(help["critical"], true);
    assert_eq!(help["message"], "CRITICAL EMERGENCY");
    let undefined = rows.iter().find(|r| r["status"] == "UNDEFINED").unwrap();
    assert!(undefined["message"].is_null());
}

#[tokio::test]
async fn test_session_not_found() {
    let app = create_test_router();
    let (status, json) = send(
        &app,
        Request::builder().uri("/session/nonexistent").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_full_session_flow() {
    let app = create_test_router();
    let id = new_session(&app).await;

    let frame = KeypointFrame::empty().with_hand(synthetic_hand([false, true, true, true, true]));
    let body = serde_json::to_string(&frame).unwrap();

    let mut last = Value::Null;
    for _ in 0..3 {
        let (status, json) = send(&app, post_json(&format!("/session/{}/frame", id), body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        last = json;
    }
    assert_eq!(last["status"], "HELP_CRITICAL");
    assert_eq!(last["confidence"], 0.95);

    let (status, json) = send(
        &app,
        Request::builder().uri(format!("/session/{}", id)).body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["session_id"], id.as_str());
    assert_eq!(json["status"], "HELP_CRITICAL");
    assert_eq!(json["message"], "CRITICAL EMERGENCY");

    let (status, json) = send(&app, post_json(&format!("/session/{}/reset", id), String::new())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "MONITORING");
    assert_eq!(json["history_len"], 0);
}

#[tokio::test]
async fn test_malformed_frame_rejected() {
    let app = create_test_router();
    let id = new_session(&app).await;

    let body = r#"{"hands": [[{"x": 0.5, "y": 0.5}]]}"#.to_string();
    let (status, json) = send(&app, post_json(&format!("/session/{}/frame", id), body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("expected 21"));
}

#[tokio::test]
async fn test_frame_for_unknown_session() {
    let app = create_test_router();
    let (status, _) = send(&app, post_json("/session/nope/frame", "{}".to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_session() {
    let app = create_test_router();
    let id = new_session(&app).await;
    let uri = format!("/session/{}", id);
    let delete = || Request::builder().method("DELETE").uri(uri.clone()).body(Body::empty()).unwrap();

    let (status, _) = send(&app, delete()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Request::builder().uri(uri.clone()).body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, delete()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, json) = send(&app, Request::builder().uri("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(json["sessions_active"], 0);
}
