//! Client for the `POST /save-text` endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const GENERIC_FAILURE: &str = "Failed to save text";
const SAVED_MESSAGE: &str = "Text saved successfully";

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Please enter some text to save")]
    EmptyText,

    /// Non-2xx response. Carries the server's `error` field when present.
    #[error("{}", .message.as_deref().unwrap_or(GENERIC_FAILURE))]
    Rejected { status: u16, message: Option<String> },

    #[error("Failed to save text")]
    Network(#[from] reqwest::Error),
}

impl SaveError {
    /// Text shown to the user. Network details go to the log, not the screen.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyText)
    }
}

#[derive(Debug, Serialize)]
struct SaveRequest<'a> {
    text: &'a str,
}

/// Successful save acknowledgement.
///
/// Any 2xx counts as saved. The body only contributes a message and file
/// name when it has them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaveReceipt {
    #[serde(default = "default_saved_message")]
    pub message: String,
    #[serde(default)]
    pub filename: Option<String>,
}

impl Default for SaveReceipt {
    fn default() -> Self {
        Self {
            message: default_saved_message(),
            filename: None,
        }
    }
}

fn default_saved_message() -> String {
    SAVED_MESSAGE.to_string()
}

impl SaveReceipt {
    /// Read a receipt from a 2xx body. Empty or foreign bodies give the default.
    fn from_body(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::default();
        }
        serde_json::from_slice(body).unwrap_or_else(|e| {
            log::debug!("Ignoring unrecognised save response body: {e}");
            Self::default()
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SaveClient {
    client: Client,
    endpoint: String,
}

impl SaveClient {
    /// `endpoint` is the service base URL, e.g. `http://127.0.0.1:5000`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Falling back to default HTTP client: {e}");
                Client::new()
            });
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self) -> String {
        format!("{}/save-text", self.endpoint.trim_end_matches('/'))
    }

    /// Post `text` to the save endpoint. Blank text is rejected locally.
    #[instrument(skip(self, text), fields(endpoint = %self.endpoint, chars = text.len()))]
    pub async fn save_text(&self, text: &str) -> Result<SaveReceipt, SaveError> {
        if text.trim().is_empty() {
            return Err(SaveError::EmptyText);
        }

        let response = self
            .client
            .post(self.url())
            .json(&SaveRequest { text })
            .send()
            .await
            .map_err(|e| {
                log::error!("Save request to {} failed: {e}", self.endpoint);
                SaveError::Network(e)
            })?;

        let status = response.status();
        if status.is_success() {
            let receipt = match response.bytes().await {
                Ok(body) => SaveReceipt::from_body(&body),
                Err(e) => {
                    log::warn!("Save succeeded with HTTP {status} but the body was unreadable: {e}");
                    SaveReceipt::default()
                }
            };
            log::info!("Text saved: {:?}", receipt.filename);
            return Ok(receipt);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .filter(|msg| !msg.is_empty());
        log::warn!("Save rejected with HTTP {status}: {message:?}");
        Err(SaveError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_falls_back() {
        let err = SaveError::Rejected { status: 502, message: None };
        assert_eq!(err.user_message(), "Failed to save text");
        let err = SaveError::Rejected {
            status: 500,
            message: Some("disk full".into()),
        };
        assert_eq!(err.user_message(), "disk full");
    }

    #[tokio::test]
    async fn test_blank_text_rejected_without_request() {
        // Nothing listens on this port; a request would fail with a network error.
        let client = SaveClient::new("http://127.0.0.1:9");
        let err = client.save_text("   ").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "Please enter some text to save");
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = SaveClient::new("http://localhost:5000/");
        assert_eq!(client.url(), "http://localhost:5000/save-text");
    }

    #[test]
    fn test_receipt_from_lenient_bodies() {
        assert_eq!(SaveReceipt::from_body(b""), SaveReceipt::default());
        assert_eq!(SaveReceipt::from_body(br#"{"success": true}"#).message, "Text saved successfully");
        assert_eq!(SaveReceipt::from_body(b"<html>ok</html>"), SaveReceipt::default());
        let receipt = SaveReceipt::from_body(br#"{"message": "Stored", "filename": "a.txt"}"#);
        assert_eq!(receipt.message, "Stored");
        assert_eq!(receipt.filename.as_deref(), Some("a.txt"));
    }
}
