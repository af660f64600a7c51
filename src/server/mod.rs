//! Save-text HTTP service.
//!
//! `POST /save-text` with `{"text": "..."}` stores the trimmed text as
//! `text_YYYYMMDD_HHMMSS.txt` in the saves directory. Existing files are never
//! overwritten; a `_N` suffix is added instead.

use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tracing::instrument;

pub const SAVED_MESSAGE: &str = "Text saved successfully";
pub const TEXT_REQUIRED: &str = "Text is required";

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("Failed to bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },

    #[error("Save service already running")]
    AlreadyRunning,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        log::error!("Save failed: {self}");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody { error: message.into() })).into_response()
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SaveTextRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveTextResponse {
    pub message: String,
    pub filename: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

// ============================================================================
// Router
// ============================================================================

struct SaveState {
    saves_dir: PathBuf,
}

/// Router with `/save-text` and `/health`, permissive CORS.
pub fn router(saves_dir: impl Into<PathBuf>) -> Router {
    let state = Arc::new(SaveState {
        saves_dir: saves_dir.into(),
    });
    Router::new()
        .route("/save-text", post(save_text))
        .route("/health", get(health_check))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn save_text(
    State(state): State<Arc<SaveState>>,
    payload: Result<Json<SaveTextRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            log::warn!("Rejected save request: {rejection}");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let text = request.text.trim();
    if text.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, TEXT_REQUIRED);
    }

    match write_text(&state.saves_dir, text).await {
        Ok(path) => {
            log::info!("Saved {} chars to {}", text.chars().count(), path.display());
            Json(SaveTextResponse {
                message: SAVED_MESSAGE.to_string(),
                filename: path.display().to_string(),
            })
            .into_response()
        }
        Err(e) => e.into_response(),
    }
}

// ============================================================================
// Storage
// ============================================================================

fn file_name(stamp: &str, attempt: u32) -> String {
    if attempt == 0 {
        format!("text_{stamp}.txt")
    } else {
        format!("text_{stamp}_{attempt}.txt")
    }
}

/// Write `text` to a new timestamped file in `dir` and return its path.
#[instrument(skip(text), fields(chars = text.len()))]
pub async fn write_text(dir: &Path, text: &str) -> Result<PathBuf, ServerError> {
    tokio::fs::create_dir_all(dir).await?;
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();

    let mut attempt = 0;
    loop {
        let path = dir.join(file_name(&stamp, attempt));
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => {
                fill_new_file(&path, file, text).await?;
                return Ok(path);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Write `text` into a file just created at `path`. The file is removed
/// again if the write fails.
async fn fill_new_file<W>(path: &Path, mut file: W, text: &str) -> io::Result<()>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    let written = async {
        file.write_all(text.as_bytes()).await?;
        file.flush().await
    }
    .await;
    if let Err(e) = written {
        drop(file);
        if let Err(remove) = tokio::fs::remove_file(path).await {
            log::warn!("Failed to remove partial file {}: {remove}", path.display());
        }
        return Err(e);
    }
    Ok(())
}

// ============================================================================
// Service lifecycle
// ============================================================================

/// Background save service bound to one address.
pub struct SaveTextService {
    addr: SocketAddr,
    saves_dir: PathBuf,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl SaveTextService {
    pub fn new(addr: SocketAddr, saves_dir: impl Into<PathBuf>) -> Self {
        Self {
            addr,
            saves_dir: saves_dir.into(),
            shutdown_tx: None,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Bind and serve in a spawned task. Returns the bound address, which
    /// differs from the configured one when port 0 was requested.
    pub async fn start(&mut self) -> Result<SocketAddr, ServerError> {
        if self.shutdown_tx.is_some() {
            return Err(ServerError::AlreadyRunning);
        }

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|source| ServerError::Bind { addr: self.addr, source })?;
        let bound = listener.local_addr()?;
        self.addr = bound;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = router(self.saves_dir.clone());

        tokio::spawn(async move {
            log::info!("Save service listening on http://{bound}");
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                    log::info!("Save service shutting down");
                })
                .await
            {
                log::error!("Save service error: {e}");
            }
        });

        self.shutdown_tx = Some(shutdown_tx);
        Ok(bound)
    }

    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }
}

impl Drop for SaveTextService {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Serve in the foreground until `shutdown` resolves.
pub async fn serve_until(
    addr: SocketAddr,
    saves_dir: PathBuf,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    log::info!(
        "Save service listening on http://{} (saving to {})",
        listener.local_addr()?,
        saves_dir.display()
    );
    axum::serve(listener, router(saves_dir))
        .with_graceful_shutdown(shutdown)
        .await?;
    log::info!("Save service stopped");
    Ok(())
}
