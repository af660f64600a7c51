//! Playback state machine.
//!
//! Tracks `Idle → Speaking ⇄ Paused → Idle` and decides which provider
//! command (if any) a request turns into. The machine never talks to the
//! provider itself; each transition returns a [`Step`] carrying the next
//! state and the command for the caller to run.
//!
//! Every started utterance gets a fresh [`UtteranceId`]. Completion signals
//! for any other id are ignored, so at most one utterance is ever active.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{SpeakRequest, UtteranceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    #[default]
    Idle,
    Speaking,
    Paused,
}

impl PlaybackState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Speaking => "Speaking",
            Self::Paused => "Paused",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("Already speaking")]
    AlreadySpeaking,

    #[error("Nothing is playing")]
    NotSpeaking,

    #[error("Playback is not paused")]
    NotPaused,
}

/// Side effect a transition asks the synthesis provider to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCommand {
    Start { id: UtteranceId, request: SpeakRequest },
    Pause,
    Resume,
    Cancel,
}

/// Outcome of one transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub playback: Playback,
    pub command: Option<ProviderCommand>,
}

/// Playback snapshot: current state, active utterance and the id counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Playback {
    state: PlaybackState,
    active: Option<UtteranceId>,
    last_id: u64,
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn active(&self) -> Option<UtteranceId> {
        self.active
    }

    pub fn is_idle(&self) -> bool {
        self.state == PlaybackState::Idle
    }

    /// `Idle → Speaking` with a new utterance, or `Paused → Speaking` by
    /// resuming. Rejected while already speaking.
    ///
    /// The request type guarantees non-empty text, so the empty-text guard is
    /// enforced where the request is built.
    pub fn speak(&self, request: SpeakRequest) -> Result<Step, PlaybackError> {
        match self.state {
            PlaybackState::Idle => {
                let id = UtteranceId(self.last_id + 1);
                Ok(Step {
                    playback: Self {
                        state: PlaybackState::Speaking,
                        active: Some(id),
                        last_id: id.0,
                    },
                    command: Some(ProviderCommand::Start { id, request }),
                })
            }
            PlaybackState::Paused => self.resume(),
            PlaybackState::Speaking => Err(PlaybackError::AlreadySpeaking),
        }
    }

    /// `Speaking → Paused`.
    pub fn pause(&self) -> Result<Step, PlaybackError> {
        match self.state {
            PlaybackState::Speaking => Ok(self.step(PlaybackState::Paused, Some(ProviderCommand::Pause))),
            _ => Err(PlaybackError::NotSpeaking),
        }
    }

    /// `Paused → Speaking`.
    pub fn resume(&self) -> Result<Step, PlaybackError> {
        match self.state {
            PlaybackState::Paused => Ok(self.step(PlaybackState::Speaking, Some(ProviderCommand::Resume))),
            _ => Err(PlaybackError::NotPaused),
        }
    }

    /// Pause when speaking, resume when paused.
    pub fn toggle_pause(&self) -> Result<Step, PlaybackError> {
        match self.state {
            PlaybackState::Speaking => self.pause(),
            PlaybackState::Paused => self.resume(),
            PlaybackState::Idle => Err(PlaybackError::NotSpeaking),
        }
    }

    /// Always permitted. Cancels the active utterance; no-op when idle.
    pub fn stop(&self) -> Step {
        match self.state {
            PlaybackState::Idle => self.step(PlaybackState::Idle, None),
            PlaybackState::Speaking | PlaybackState::Paused => Step {
                playback: Self {
                    state: PlaybackState::Idle,
                    active: None,
                    last_id: self.last_id,
                },
                command: Some(ProviderCommand::Cancel),
            },
        }
    }

    /// The provider finished (or failed) utterance `id`. Returns `None` when
    /// `id` is not the active utterance.
    pub fn finished(&self, id: UtteranceId) -> Option<Playback> {
        if self.active != Some(id) {
            return None;
        }
        Some(Self {
            state: PlaybackState::Idle,
            active: None,
            last_id: self.last_id,
        })
    }

    fn step(&self, state: PlaybackState, command: Option<ProviderCommand>) -> Step {
        Step {
            playback: Self { state, ..*self },
            command,
        }
    }
}
