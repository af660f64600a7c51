//! Test doubles for the provider seam.
//!
//! `MockSynthesisProvider` (mockall) covers strict call expectations. The
//! recording types here are for flows where the calls happen on a spawned
//! worker and the test only inspects what arrived.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::voice::types::Result;
use crate::core::voice::{
    ProviderCommand, ProviderEvent, ProviderEventSink, SpeakRequest, SynthesisProvider, UtteranceId,
    Voice, VoiceError,
};

// ============================================================================
// Recording provider
// ============================================================================

/// Provider that records every command it receives.
pub struct RecordingProvider {
    available: bool,
    voices: Vec<Voice>,
    fail_speak: bool,
    sink: Option<Arc<dyn ProviderEventSink>>,
    commands: Mutex<Vec<ProviderCommand>>,
}

impl Default for RecordingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self {
            available: true,
            voices: Vec::new(),
            fail_speak: false,
            sink: None,
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn with_voices(mut self, voices: Vec<Voice>) -> Self {
        self.voices = voices;
        self
    }

    /// Make `speak` return an error instead of starting.
    pub fn failing(mut self) -> Self {
        self.fail_speak = true;
        self
    }

    /// Emit a start event through `sink` whenever `speak` succeeds.
    pub fn with_sink(mut self, sink: Arc<dyn ProviderEventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn commands(&self) -> Vec<ProviderCommand> {
        self.commands.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, command: ProviderCommand) {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(command);
        }
    }
}

#[async_trait]
impl SynthesisProvider for RecordingProvider {
    fn id(&self) -> &'static str {
        "recording"
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn list_voices(&self) -> Result<Vec<Voice>> {
        Ok(self.voices.clone())
    }

    async fn speak(&self, id: UtteranceId, request: &SpeakRequest) -> Result<()> {
        self.record(ProviderCommand::Start {
            id,
            request: request.clone(),
        });
        if self.fail_speak {
            return Err(VoiceError::ProviderError("synthesizer crashed".into()));
        }
        if let Some(sink) = &self.sink {
            sink.emit(ProviderEvent::UtteranceStarted { id });
        }
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.record(ProviderCommand::Pause);
        Ok(())
    }

    async fn resume(&self) -> Result<()> {
        self.record(ProviderCommand::Resume);
        Ok(())
    }

    async fn cancel(&self) -> Result<()> {
        self.record(ProviderCommand::Cancel);
        Ok(())
    }
}

// ============================================================================
// Recording sink
// ============================================================================

/// Sink that keeps every event it is given.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ProviderEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<ProviderEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl ProviderEventSink for RecordingSink {
    fn emit(&self, event: ProviderEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
