use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::core::panel::{Effect, PanelMsg, PanelState};
use crate::core::voice::PlaybackState;

use super::events::{Action, AppEvent, Notification, NotificationLevel};
use super::layout::PanelLayout;
use super::services::Services;
use super::theme::Palette;
use super::views::panel::{PanelViewState, ViewResult};

/// Notifications kept on screen at once.
const MAX_NOTIFICATIONS: usize = 3;

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Panel model. Replaced wholesale on every update.
    pub panel: PanelState,
    /// Editor and focus state for the panel view.
    pub view: PanelViewState,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    /// Monotonic counter for notification IDs.
    notification_counter: u64,
    /// Whether the help modal is open.
    pub show_help: bool,
    /// Receiver for backend events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Backend services handle.
    services: Services,
}

impl AppState {
    pub fn new(
        panel: PanelState,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        services: Services,
    ) -> Self {
        let mut view = PanelViewState::new();
        view.sync(&panel);
        Self {
            running: true,
            panel,
            view,
            notifications: Vec::new(),
            notification_counter: 0,
            show_help: false,
            event_rx,
            services,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        self.services.check_provider();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        // Leave nothing speaking behind the restored terminal.
        if self.panel.playback_state() != PlaybackState::Idle {
            self.dispatch(PanelMsg::Stop);
        }
        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => {
                // Priority 1: Blocking notice swallows input until dismissed
                if self.panel.blocking_notice.is_some() {
                    if is_dismiss_key(&crossterm_event) {
                        self.dispatch(PanelMsg::DismissNotice);
                    }
                    return;
                }

                // Priority 2: Help modal
                if self.show_help {
                    if let Some(action) = self.map_help_input(&crossterm_event) {
                        self.handle_action(action);
                    }
                    return;
                }

                // Priority 3: Global keybindings that must beat the editor
                if let Some(action) = self.map_chord_to_action(&crossterm_event) {
                    self.handle_action(action);
                    return;
                }

                // Priority 4: Focused control (or the open file prompt)
                match self.view.handle_input(&crossterm_event, &self.panel) {
                    ViewResult::Consumed => return,
                    ViewResult::Msg(msg) => {
                        self.dispatch(msg);
                        return;
                    }
                    ViewResult::Ignored => {}
                }

                // Priority 5: Remaining global keys
                if let Some(action) = self.map_input_to_action(&crossterm_event) {
                    self.handle_action(action);
                }
            }
            AppEvent::Panel(msg) => self.dispatch(msg),
            AppEvent::Tick => self.on_tick(),
            AppEvent::Notification(notification) => {
                self.push_notification(notification.message, notification.level);
            }
            AppEvent::Quit => {
                self.running = false;
            }
        }
    }

    /// Run one panel update and hand its effects to the services.
    pub fn dispatch(&mut self, msg: PanelMsg) {
        let update = self.panel.update(msg);
        self.panel = update.state;
        self.view.sync(&self.panel);
        for effect in update.effects {
            match effect {
                Effect::Notify(notice) => {
                    let notification = Notification::from(notice);
                    self.push_notification(notification.message, notification.level);
                }
                other => self.services.run_effect(other),
            }
        }
    }

    /// Map help modal input to action.
    fn map_help_input(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::F(1) => Some(Action::CloseHelp),
            _ => None,
        }
    }

    /// Control chords and focus keys, checked before the focused control.
    fn map_chord_to_action(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        if self.view.is_prompting() {
            return match (*modifiers, *code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
                _ => None,
            };
        }

        match (*modifiers, *code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            (KeyModifiers::CONTROL, KeyCode::Char('p')) => Some(Action::Panel(PanelMsg::Speak)),
            (KeyModifiers::CONTROL, KeyCode::Char('k')) => Some(Action::Panel(PanelMsg::TogglePause)),
            (KeyModifiers::CONTROL, KeyCode::Char('x')) => Some(Action::Panel(PanelMsg::Stop)),
            (KeyModifiers::CONTROL, KeyCode::Char('t')) => Some(Action::Panel(PanelMsg::ToggleTheme)),
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => Some(Action::Panel(PanelMsg::SaveRequested)),
            (KeyModifiers::CONTROL, KeyCode::Char('r')) => Some(Action::Panel(PanelMsg::ReloadVoices)),
            (KeyModifiers::CONTROL, KeyCode::Char('o')) => Some(Action::OpenFilePrompt),
            (_, KeyCode::Tab) => Some(Action::FocusNext),
            (_, KeyCode::BackTab) => Some(Action::FocusPrev),
            (_, KeyCode::F(1)) => Some(Action::ShowHelp),
            _ => None,
        }
    }

    /// Keys only reached when the focused control ignored them.
    fn map_input_to_action(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (*modifiers, *code) {
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('q')) => Some(Action::Quit),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('?')) => Some(Action::ShowHelp),
            (KeyModifiers::NONE, KeyCode::Char(' ')) => Some(Action::Panel(PanelMsg::TogglePause)),
            (KeyModifiers::NONE, KeyCode::Enter) => Some(Action::Panel(PanelMsg::Speak)),
            (KeyModifiers::NONE, KeyCode::Esc) => Some(Action::Panel(PanelMsg::Stop)),
            _ => None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Panel(msg) => self.dispatch(msg),
            Action::FocusNext => self.view.focus = self.view.focus.next(),
            Action::FocusPrev => self.view.focus = self.view.focus.prev(),
            Action::OpenFilePrompt => self.view.open_file_prompt(),
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
        }
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Push a notification (dedup by message, max 3).
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }

        self.notification_counter += 1;
        self.notifications.push(Notification {
            id: self.notification_counter,
            message,
            level,
            ttl_ticks: 100,
        });

        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
    }

    /// Tick: decrement notification TTLs, dismiss expired.
    fn on_tick(&mut self) {
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let palette = Palette::for_theme(self.panel.theme);

        frame.render_widget(Block::default().style(palette.base()), area);

        let (layout, _) = PanelLayout::compute(area);
        self.view.render_text(frame, layout.text, &self.panel, &palette);
        self.view.render_controls(frame, layout.controls, &self.panel, &palette);
        self.render_status_bar(frame, layout.status, &palette);

        // Overlays
        self.render_notifications(frame, area, &palette);
        self.view.render_file_prompt(frame, area, &palette);

        if self.show_help {
            self.render_help_modal(frame, area, &palette);
        }

        if let Some(message) = &self.panel.blocking_notice {
            render_blocking_notice(frame, area, message, &palette);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let (label, color) = match self.panel.playback_state() {
            PlaybackState::Idle => ("IDLE", palette.text_muted),
            PlaybackState::Speaking => ("SPEAKING", palette.success),
            PlaybackState::Paused => ("PAUSED", palette.warning),
        };

        let status = Line::from(vec![
            Span::styled(" SPEAKPANEL ", palette.brand_badge()),
            Span::raw(" "),
            Span::styled(format!(" {label} "), palette.badge(color)),
            Span::raw(" "),
            Span::styled(self.view.focus.label(), palette.heading()),
            Span::styled(" │ ", palette.dim()),
            Span::styled("Ctrl+P", palette.key_hint()),
            Span::styled(":speak ", palette.muted()),
            Span::styled("Ctrl+K", palette.key_hint()),
            Span::styled(":pause ", palette.muted()),
            Span::styled("Ctrl+X", palette.key_hint()),
            Span::styled(":stop ", palette.muted()),
            Span::styled("Ctrl+S", palette.key_hint()),
            Span::styled(":save ", palette.muted()),
            Span::styled("F1", palette.key_hint()),
            Span::styled(":help ", palette.muted()),
            Span::styled(" │ ", palette.dim()),
            Span::styled(self.panel.theme.as_str(), palette.muted()),
        ]);

        frame.render_widget(Paragraph::new(status).style(Style::default().bg(palette.surface)), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 50.min(area.width.saturating_sub(2));
        let height = self.notifications.len() as u16;
        let x = area.width.saturating_sub(max_width + 1);
        let y = 1;

        let notification_area = Rect::new(x, y, max_width, height);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, color) = match n.level {
                    NotificationLevel::Info => ("ℹ", palette.info),
                    NotificationLevel::Success => ("✓", palette.success),
                    NotificationLevel::Warning => ("⚠", palette.warning),
                    NotificationLevel::Error => ("✗", palette.error),
                };
                Line::from(vec![
                    Span::styled(format!(" {prefix} "), Style::default().fg(color).bold()),
                    Span::raw(n.message.as_str()),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(
            Paragraph::new(lines).style(Style::default().fg(palette.text).bg(palette.surface)),
            notification_area,
        );
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let modal = centered_rect(60, 80, area);

        let keybindings = vec![
            ("Global:", ""),
            ("Tab / Shift+Tab", "Next / previous control"),
            ("Ctrl+P", "Speak (resumes when paused)"),
            ("Ctrl+K", "Pause / resume"),
            ("Ctrl+X", "Stop"),
            ("Ctrl+O", "Open a .txt file"),
            ("Ctrl+S", "Save text to the server"),
            ("Ctrl+R", "Reload voices"),
            ("Ctrl+T", "Switch theme"),
            ("F1", "Toggle this help"),
            ("Ctrl+C", "Quit"),
            ("", ""),
            ("Controls (outside the text box):", ""),
            ("h/l or ←/→", "Previous / next choice"),
            ("j/k or ↓/↑", "Next / previous choice"),
            ("Enter", "Speak"),
            ("Space", "Pause / resume"),
            ("Esc", "Stop"),
            ("? / q", "Help / quit"),
        ];

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(" Keybindings", palette.title())),
            Line::raw(""),
        ];

        for (key, desc) in &keybindings {
            if key.is_empty() {
                lines.push(Line::raw(""));
            } else if desc.is_empty() {
                lines.push(Line::from(Span::styled(format!("  {key}"), palette.title())));
            } else {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(format!("{:<22}", key), palette.key_hint()),
                    Span::raw(*desc),
                ]));
            }
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("  Press "),
            Span::styled("F1", palette.key_hint()),
            Span::raw(" or "),
            Span::styled("Esc", palette.key_hint()),
            Span::raw(" to close"),
        ]));

        let block = palette.block("Help", true).title_alignment(Alignment::Center);

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}

fn is_dismiss_key(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(KeyEvent {
            code: KeyCode::Enter | KeyCode::Esc,
            kind: KeyEventKind::Press,
            ..
        })
    )
}

fn render_blocking_notice(frame: &mut Frame, area: Rect, message: &str, palette: &Palette) {
    let modal = centered_rect(50, 30, area);
    let block = palette
        .block("Notice", true)
        .title_alignment(Alignment::Center)
        .border_style(Style::default().fg(palette.error));

    let mut lines: Vec<Line> = vec![Line::raw("")];
    lines.extend(message.lines().map(|l| Line::from(l.to_string())));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Press Enter to continue", palette.dim())));

    frame.render_widget(Clear, modal);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        modal,
    );
}

/// Calculate a centered rect using percentage of parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
