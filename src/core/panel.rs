//! Control panel state.
//!
//! [`PanelState`] is an immutable snapshot. [`PanelState::update`] takes one
//! [`PanelMsg`] and returns the next snapshot plus the [`Effect`]s the runtime
//! must perform (provider commands, file reads, saves, preference writes and
//! user notices). Nothing in here does I/O.

use std::path::PathBuf;

use super::preferences::ThemeName;
use super::save::SaveReceipt;
use super::text_file::check_text_file;
use super::voice::{
    CatalogSelection, GenderKeyword, Playback, PlaybackError, PlaybackState, ProviderCommand,
    SpeakRequest, SpeechParams, UtteranceId, Voice,
};

pub const UNAVAILABLE_MESSAGE: &str =
    "Speech synthesis is not available. Playback controls are disabled.";

// ============================================================================
// Messages and effects
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum PanelMsg {
    // Catalog
    VoicesLoaded(Vec<Voice>),
    ReloadVoices,
    SelectLanguage(String),
    SelectVoice(String),
    SelectGender(GenderKeyword),

    // Parameters and text
    SetRate(f32),
    SetVolume(f32),
    SetPitch(f32),
    SetText(String),

    // Playback controls
    Speak,
    Pause,
    Resume,
    TogglePause,
    Stop,

    // Provider signals
    UtteranceStarted(UtteranceId),
    UtteranceEnded(UtteranceId),
    UtteranceFailed(UtteranceId, String),
    ProviderUnavailable(String),
    /// A provider command failed. Carries the utterance the command was
    /// aimed at, when the worker knows it.
    ProviderCommandFailed(Option<UtteranceId>, String),
    DismissNotice,

    // Save
    SaveRequested,
    SaveSucceeded(SaveReceipt),
    SaveFailed(String),

    // File input
    OpenFile(PathBuf),
    FileLoaded(String),
    FileFailed(String),

    ToggleTheme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Provider(ProviderCommand),
    ReloadVoices,
    SaveText(String),
    ReadFile(PathBuf),
    PersistTheme(ThemeName),
    Notify(Notice),
}

/// Result of one [`PanelState::update`].
#[derive(Debug, Clone)]
pub struct Update {
    pub state: PanelState,
    pub effects: Vec<Effect>,
}

impl Update {
    fn plain(state: PanelState) -> Self {
        Self { state, effects: Vec::new() }
    }

    fn with(state: PanelState, effect: Effect) -> Self {
        Self { state, effects: vec![effect] }
    }

    fn notify(state: PanelState, notice: Notice) -> Self {
        Self::with(state, Effect::Notify(notice))
    }
}

// ============================================================================
// Panel state
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub selection: CatalogSelection,
    pub text: String,
    pub params: SpeechParams,
    pub playback: Playback,
    pub theme: ThemeName,
    /// False once the provider is known to be unusable.
    pub controls_enabled: bool,
    /// Blocking notice shown until dismissed.
    pub blocking_notice: Option<String>,
    pub saving: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new(SpeechParams::default(), ThemeName::default())
    }
}

impl PanelState {
    pub fn new(params: SpeechParams, theme: ThemeName) -> Self {
        Self {
            selection: CatalogSelection::default(),
            text: String::new(),
            params,
            playback: Playback::new(),
            theme,
            controls_enabled: true,
            blocking_notice: None,
            saving: false,
        }
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    /// Speak request for the current text, voice and parameters.
    pub fn speak_request(&self) -> Result<SpeakRequest, crate::core::voice::ValidationError> {
        SpeakRequest::new(&self.text, self.selection.resolve_selected(), self.params)
    }

    pub fn update(&self, msg: PanelMsg) -> Update {
        let mut next = self.clone();
        match msg {
            PanelMsg::VoicesLoaded(voices) => {
                next.selection = self.selection.reload(voices);
                Update::plain(next)
            }
            PanelMsg::ReloadVoices => Update::with(next, Effect::ReloadVoices),
            PanelMsg::SelectLanguage(lang) => {
                next.selection = self.selection.select_language(&lang);
                Update::plain(next)
            }
            PanelMsg::SelectVoice(name) => {
                next.selection = self.selection.select_voice(&name);
                Update::plain(next)
            }
            PanelMsg::SelectGender(gender) => {
                next.selection = self.selection.select_gender(gender);
                Update::plain(next)
            }

            PanelMsg::SetRate(rate) => {
                next.params = self.params.with_rate(rate);
                Update::plain(next)
            }
            PanelMsg::SetVolume(volume) => {
                next.params = self.params.with_volume(volume);
                Update::plain(next)
            }
            PanelMsg::SetPitch(pitch) => {
                next.params = self.params.with_pitch(pitch);
                Update::plain(next)
            }
            PanelMsg::SetText(text) => {
                next.text = text;
                Update::plain(next)
            }

            PanelMsg::Speak => self.speak(next),
            PanelMsg::Pause => self.playback_step(next, self.playback.pause()),
            PanelMsg::Resume => self.playback_step(next, self.playback.resume()),
            PanelMsg::TogglePause => self.playback_step(next, self.playback.toggle_pause()),
            PanelMsg::Stop => {
                let step = self.playback.stop();
                next.playback = step.playback;
                Update {
                    state: next,
                    effects: step.command.map(Effect::Provider).into_iter().collect(),
                }
            }

            PanelMsg::UtteranceStarted(id) => {
                log::debug!("Utterance {id} started");
                Update::plain(next)
            }
            PanelMsg::UtteranceEnded(id) => {
                if let Some(playback) = self.playback.finished(id) {
                    next.playback = playback;
                }
                Update::plain(next)
            }
            PanelMsg::UtteranceFailed(id, message) => match self.playback.finished(id) {
                Some(playback) => {
                    next.playback = playback;
                    Update::notify(next, Notice::error(format!("Speech error: {message}")))
                }
                None => Update::plain(next),
            },
            PanelMsg::ProviderUnavailable(reason) => {
                log::warn!("Speech provider unavailable: {reason}");
                next.controls_enabled = false;
                next.playback = self.playback.stop().playback;
                if self.controls_enabled {
                    next.blocking_notice = Some(format!("{UNAVAILABLE_MESSAGE}\n\n{reason}"));
                }
                Update::plain(next)
            }
            PanelMsg::ProviderCommandFailed(target, message) => {
                let current = match target {
                    Some(id) => self.playback.active() == Some(id),
                    None => !self.playback.is_idle(),
                };
                if !current {
                    log::debug!("Ignoring speech command failure for a finished utterance: {message}");
                    return Update::plain(next);
                }
                let step = self.playback.stop();
                next.playback = step.playback;
                let mut effects: Vec<Effect> = step.command.map(Effect::Provider).into_iter().collect();
                effects.push(Effect::Notify(Notice::error(format!("Speech error: {message}"))));
                Update { state: next, effects }
            }
            PanelMsg::DismissNotice => {
                next.blocking_notice = None;
                Update::plain(next)
            }

            PanelMsg::SaveRequested => {
                if self.saving {
                    return Update::plain(next);
                }
                if self.text.trim().is_empty() {
                    return Update::notify(next, Notice::error("Please enter some text to save"));
                }
                next.saving = true;
                Update::with(next, Effect::SaveText(self.text.clone()))
            }
            PanelMsg::SaveSucceeded(receipt) => {
                next.saving = false;
                let message = match &receipt.filename {
                    Some(filename) => format!("{} ({filename})", receipt.message),
                    None => receipt.message,
                };
                Update::notify(next, Notice::success(message))
            }
            PanelMsg::SaveFailed(message) => {
                next.saving = false;
                Update::notify(next, Notice::error(message))
            }

            PanelMsg::OpenFile(path) => match check_text_file(&path) {
                Ok(()) => Update::with(next, Effect::ReadFile(path)),
                Err(e) => Update::notify(next, Notice::error(e.to_string())),
            },
            PanelMsg::FileLoaded(text) => {
                next.text = text;
                Update::notify(next, Notice::info("File loaded"))
            }
            PanelMsg::FileFailed(message) => Update::notify(next, Notice::error(message)),

            PanelMsg::ToggleTheme => {
                next.theme = self.theme.toggled();
                let theme = next.theme;
                Update::with(next, Effect::PersistTheme(theme))
            }
        }
    }

    fn speak(&self, mut next: PanelState) -> Update {
        if !self.controls_enabled {
            return Update::notify(next, Notice::warning(UNAVAILABLE_MESSAGE));
        }
        // Speak while paused resumes, whatever the current text is.
        if self.playback.state() == PlaybackState::Paused {
            return self.playback_step(next, self.playback.resume());
        }
        if self.playback.state() == PlaybackState::Speaking {
            return Update::notify(next, Notice::info(PlaybackError::AlreadySpeaking.to_string()));
        }
        let request = match self.speak_request() {
            Ok(request) => request,
            Err(e) => return Update::notify(next, Notice::error(e.to_string())),
        };
        match self.playback.speak(request) {
            Ok(step) => {
                next.playback = step.playback;
                Update {
                    state: next,
                    effects: step.command.map(Effect::Provider).into_iter().collect(),
                }
            }
            Err(e) => Update::notify(next, Notice::info(e.to_string())),
        }
    }

    fn playback_step(
        &self,
        mut next: PanelState,
        step: Result<crate::core::voice::playback::Step, PlaybackError>,
    ) -> Update {
        if !self.controls_enabled {
            return Update::plain(next);
        }
        match step {
            Ok(step) => {
                next.playback = step.playback;
                Update {
                    state: next,
                    effects: step.command.map(Effect::Provider).into_iter().collect(),
                }
            }
            Err(e) => {
                log::debug!("Ignoring playback control: {e}");
                Update::plain(next)
            }
        }
    }
}
