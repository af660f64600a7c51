//! Synthesis provider abstraction.
//!
//! A provider owns the platform side of speech: listing voices and running
//! at most one utterance at a time. Completion is reported asynchronously
//! through a [`ProviderEventSink`] handed to the provider at construction.

pub mod espeak;

use async_trait::async_trait;
use serde::Serialize;

use super::playback::ProviderCommand;
use super::types::{Result, SpeakRequest, UtteranceId, Voice};

pub use espeak::EspeakProvider;

// ============================================================================
// Provider Trait
// ============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SynthesisProvider: Send + Sync {
    /// Short identifier used in logs.
    fn id(&self) -> &'static str;

    /// Whether speech can be produced at all on this machine.
    async fn is_available(&self) -> bool;

    /// Current voice list. May be empty while the platform is still loading.
    async fn list_voices(&self) -> Result<Vec<Voice>>;

    /// Start speaking. Any utterance already running is cancelled first.
    async fn speak(&self, id: UtteranceId, request: &SpeakRequest) -> Result<()>;

    async fn pause(&self) -> Result<()>;

    async fn resume(&self) -> Result<()>;

    /// Cancel the running utterance. No completion event is emitted for it.
    async fn cancel(&self) -> Result<()>;
}

/// Run one command produced by the playback state machine.
pub async fn run_command(provider: &dyn SynthesisProvider, command: ProviderCommand) -> Result<()> {
    match command {
        ProviderCommand::Start { id, request } => {
            log::info!(
                "[{}] speaking {} ({} chars, voice: {})",
                provider.id(),
                id,
                request.text().chars().count(),
                request.voice.as_ref().map(|v| v.name.as_str()).unwrap_or("default")
            );
            provider.speak(id, &request).await
        }
        ProviderCommand::Pause => provider.pause().await,
        ProviderCommand::Resume => provider.resume().await,
        ProviderCommand::Cancel => provider.cancel().await,
    }
}

// ============================================================================
// Provider Events
// ============================================================================

/// Asynchronous notifications from a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderEvent {
    /// The platform voice list changed; callers should reload the catalog.
    VoicesChanged,
    UtteranceStarted { id: UtteranceId },
    UtteranceEnded { id: UtteranceId },
    UtteranceFailed { id: UtteranceId, message: String },
}

/// Receiver of provider events.
///
/// Implementations forward events to the TUI loop, log them, or drop them.
pub trait ProviderEventSink: Send + Sync {
    fn emit(&self, event: ProviderEvent);
}

/// Discards every event. Used by headless commands and tests.
pub struct NoopSink;

impl ProviderEventSink for NoopSink {
    fn emit(&self, _event: ProviderEvent) {}
}

impl ProviderEventSink for tokio::sync::mpsc::UnboundedSender<ProviderEvent> {
    fn emit(&self, event: ProviderEvent) {
        if self.send(event).is_err() {
            log::debug!("Provider event dropped: receiver closed");
        }
    }
}
