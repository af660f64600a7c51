//! Save service tests.
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`, plus one
//! round trip through a real listener and the HTTP client.

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use crate::core::save::SaveClient;
use crate::server::{router, ErrorBody, SaveTextResponse, SaveTextService, SAVED_MESSAGE, TEXT_REQUIRED};

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/save-text")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn test_save_writes_trimmed_text() {
    let dir = tempfile::tempdir().unwrap();
    let response = router(dir.path())
        .oneshot(post_json(r#"{"text": "  Hello world \n"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: SaveTextResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body.message, SAVED_MESSAGE);
    let saved = std::fs::read_to_string(&body.filename).unwrap();
    assert_eq!(saved, "Hello world");
}

#[tokio::test]
async fn test_blank_text_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    for payload in [r#"{"text": "   "}"#, r#"{}"#] {
        let response = router(dir.path()).oneshot(post_json(payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body.error, TEXT_REQUIRED);
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let response = router(dir.path()).oneshot(post_json("not json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(!body.error.is_empty());
}

#[tokio::test]
async fn test_unwritable_directory_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "x").unwrap();

    let response = router(&blocker)
        .oneshot(post_json(r#"{"text": "Hello"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorBody = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(!body.error.is_empty());
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let response = router(dir.path())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_client_round_trip_through_service() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = SaveTextService::new(SocketAddr::from(([127, 0, 0, 1], 0)), dir.path());
    service.start().await.unwrap();

    let client = SaveClient::new(service.url());
    let first = client.save_text("first").await.unwrap();
    let second = client.save_text("second").await.unwrap();
    service.stop();

    let first = first.filename.unwrap();
    let second = second.filename.unwrap();
    assert_ne!(first, second);
    assert_eq!(std::fs::read_to_string(first).unwrap(), "first");
    assert_eq!(std::fs::read_to_string(second).unwrap(), "second");
}
