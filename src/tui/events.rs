use crate::core::panel::{Notice, NoticeLevel, PanelMsg};

/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick for notification TTLs.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// A panel message produced by a background task or the provider.
    Panel(PanelMsg),
    /// Notification to display to the user.
    Notification(Notification),
    /// Request to quit the application.
    Quit,
}

/// High-level actions resolved from key presses.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Panel(PanelMsg),
    FocusNext,
    FocusPrev,
    OpenFilePrompt,
    ShowHelp,
    CloseHelp,
    Quit,
}

/// Which panel control has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Text,
    Language,
    Gender,
    Voice,
    Rate,
    Volume,
    Pitch,
}

impl Control {
    pub const ALL: [Control; 7] = [
        Control::Text,
        Control::Language,
        Control::Gender,
        Control::Voice,
        Control::Rate,
        Control::Volume,
        Control::Pitch,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Control::Text => "Text",
            Control::Language => "Language",
            Control::Gender => "Gender",
            Control::Voice => "Voice",
            Control::Rate => "Rate",
            Control::Volume => "Volume",
            Control::Pitch => "Pitch",
        }
    }

    pub fn next(self) -> Control {
        let idx = Control::ALL.iter().position(|&c| c == self).unwrap_or(0);
        Control::ALL[(idx + 1) % Control::ALL.len()]
    }

    pub fn prev(self) -> Control {
        let idx = Control::ALL.iter().position(|&c| c == self).unwrap_or(0);
        Control::ALL[(idx + Control::ALL.len() - 1) % Control::ALL.len()]
    }
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl From<NoticeLevel> for NotificationLevel {
    fn from(level: NoticeLevel) -> Self {
        match level {
            NoticeLevel::Info => NotificationLevel::Info,
            NoticeLevel::Success => NotificationLevel::Success,
            NoticeLevel::Warning => NotificationLevel::Warning,
            NoticeLevel::Error => NotificationLevel::Error,
        }
    }
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}

impl From<Notice> for Notification {
    fn from(notice: Notice) -> Self {
        Self {
            id: 0,
            message: notice.message,
            level: notice.level.into(),
            ttl_ticks: 100,
        }
    }
}
