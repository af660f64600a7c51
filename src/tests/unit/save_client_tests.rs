//! Save client tests.
//!
//! Uses wiremock to check:
//! - Request shape (`POST /save-text` with `{"text": ...}`)
//! - Receipt parsing, including 2xx replies without a receipt body
//! - Server error messages passed through to the user
//! - Generic fallback when the body carries no message

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::save::{SaveClient, SaveError};

#[tokio::test]
async fn test_save_success_returns_receipt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/save-text"))
        .and(body_json(json!({ "text": "Hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Text saved successfully",
            "filename": "saves/text_20260101_120000.txt"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SaveClient::new(server.uri());
    let receipt = client.save_text("Hello").await.unwrap();

    assert_eq!(receipt.message, "Text saved successfully");
    assert_eq!(receipt.filename.as_deref(), Some("saves/text_20260101_120000.txt"));
}

#[tokio::test]
async fn test_success_flag_body_is_saved() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/save-text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = SaveClient::new(server.uri()).save_text("Hello").await.unwrap();
    assert_eq!(receipt.message, "Text saved successfully");
    assert!(receipt.filename.is_none());
}

#[tokio::test]
async fn test_no_content_is_saved() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/save-text"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = SaveClient::new(server.uri()).save_text("Hello").await.unwrap();
    assert_eq!(receipt.message, "Text saved successfully");
}

#[tokio::test]
async fn test_non_json_success_body_is_saved() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/save-text"))
        .respond_with(ResponseTemplate::new(201).set_body_string("saved"))
        .mount(&server)
        .await;

    assert!(SaveClient::new(server.uri()).save_text("Hello").await.is_ok());
}

#[tokio::test]
async fn test_trailing_slash_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/save-text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SaveClient::new(format!("{}/", server.uri()));
    let receipt = client.save_text("Hello").await.unwrap();
    assert_eq!(receipt.message, "ok");
    assert!(receipt.filename.is_none());
}

#[tokio::test]
async fn test_server_error_message_is_shown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/save-text"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "disk full" })))
        .mount(&server)
        .await;

    let err = SaveClient::new(server.uri()).save_text("Hello").await.unwrap_err();
    match &err {
        SaveError::Rejected { status, message } => {
            assert_eq!(*status, 500);
            assert_eq!(message.as_deref(), Some("disk full"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message(), "disk full");
}

#[tokio::test]
async fn test_error_without_body_uses_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/save-text"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = SaveClient::new(server.uri()).save_text("Hello").await.unwrap_err();
    assert!(matches!(err, SaveError::Rejected { status: 502, message: None }));
    assert_eq!(err.user_message(), "Failed to save text");
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Port 9 (discard) is not expected to be listening.
    let err = SaveClient::new("http://127.0.0.1:9").save_text("Hello").await.unwrap_err();
    assert!(matches!(err, SaveError::Network(_)));
    assert_eq!(err.user_message(), "Failed to save text");
}
