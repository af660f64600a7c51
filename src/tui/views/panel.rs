//! The speech panel view: text editor plus the voice and parameter controls.
//!
//! The view owns only editor state (cursor, focus, path prompt). Everything
//! else is read from the [`PanelState`] snapshot, and every change is
//! returned as a [`PanelMsg`] for the app to dispatch.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, LineGauge, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::core::panel::{PanelMsg, PanelState};
use crate::core::voice::types::{
    PITCH_MAX, PITCH_MIN, PITCH_STEP, RATE_MAX, RATE_MIN, RATE_STEP, VOLUME_MAX, VOLUME_MIN,
    VOLUME_STEP,
};
use crate::core::voice::{language_label, PlaybackState};

use super::super::app::centered_rect;
use super::super::events::Control;
use super::super::theme::Palette;
use super::super::widgets::input_buffer::InputBuffer;

/// Outcome of routing a key press through the view.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewResult {
    Ignored,
    Consumed,
    Msg(PanelMsg),
}

pub struct PanelViewState {
    pub focus: Control,
    editor: InputBuffer,
    /// Path prompt opened with Ctrl+O.
    file_prompt: Option<InputBuffer>,
}

impl Default for PanelViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelViewState {
    pub fn new() -> Self {
        Self {
            focus: Control::Text,
            editor: InputBuffer::new(),
            file_prompt: None,
        }
    }

    pub fn editor_text(&self) -> &str {
        self.editor.text()
    }

    /// Pull in text changed outside the editor (e.g. a loaded file).
    pub fn sync(&mut self, panel: &PanelState) {
        if self.editor.text() != panel.text {
            self.editor.set(&panel.text);
        }
    }

    pub fn open_file_prompt(&mut self) {
        self.file_prompt = Some(InputBuffer::new());
    }

    pub fn is_prompting(&self) -> bool {
        self.file_prompt.is_some()
    }

    // ── Input ───────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event, panel: &PanelState) -> ViewResult {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return ViewResult::Ignored;
        };

        if self.file_prompt.is_some() {
            return self.handle_prompt_key(*modifiers, *code);
        }

        match self.focus {
            Control::Text => self.handle_editor_key(*modifiers, *code),
            control => handle_control_key(control, *modifiers, *code, panel),
        }
    }

    fn handle_prompt_key(&mut self, modifiers: KeyModifiers, code: KeyCode) -> ViewResult {
        let Some(prompt) = self.file_prompt.as_mut() else {
            return ViewResult::Ignored;
        };
        match (modifiers, code) {
            (_, KeyCode::Esc) => {
                self.file_prompt = None;
                ViewResult::Consumed
            }
            (_, KeyCode::Enter) => {
                let input = prompt.take();
                self.file_prompt = None;
                if input.trim().is_empty() {
                    return ViewResult::Consumed;
                }
                ViewResult::Msg(PanelMsg::OpenFile(crate::core::text_file::expand_home(&input)))
            }
            (_, KeyCode::Backspace) => {
                prompt.backspace();
                ViewResult::Consumed
            }
            (_, KeyCode::Left) => {
                prompt.move_left();
                ViewResult::Consumed
            }
            (_, KeyCode::Right) => {
                prompt.move_right();
                ViewResult::Consumed
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                prompt.insert_char(c);
                ViewResult::Consumed
            }
            _ => ViewResult::Consumed,
        }
    }

    fn handle_editor_key(&mut self, modifiers: KeyModifiers, code: KeyCode) -> ViewResult {
        let edited = match (modifiers, code) {
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.editor.insert_char(c);
                true
            }
            (_, KeyCode::Enter) => {
                self.editor.insert_newline();
                true
            }
            (_, KeyCode::Backspace) => {
                self.editor.backspace();
                true
            }
            (_, KeyCode::Delete) => {
                self.editor.delete();
                true
            }
            (_, KeyCode::Left) => {
                self.editor.move_left();
                false
            }
            (_, KeyCode::Right) => {
                self.editor.move_right();
                false
            }
            (_, KeyCode::Up) => {
                self.editor.move_up();
                false
            }
            (_, KeyCode::Down) => {
                self.editor.move_down();
                false
            }
            (_, KeyCode::Home) => {
                self.editor.move_home();
                false
            }
            (_, KeyCode::End) => {
                self.editor.move_end();
                false
            }
            _ => return ViewResult::Ignored,
        };
        if edited {
            ViewResult::Msg(PanelMsg::SetText(self.editor.text().to_string()))
        } else {
            ViewResult::Consumed
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn render_text(&self, frame: &mut Frame, area: Rect, panel: &PanelState, palette: &Palette) {
        let focused = self.focus == Control::Text && self.file_prompt.is_none();
        let title = format!("Text ({} chars)", panel.text.chars().count());
        let block = palette.block(&title, focused);
        let inner = block.inner(area);

        let (line, col) = self.editor.cursor_line_col();
        let scroll = (line as u16).saturating_sub(inner.height.saturating_sub(1));

        let body = if self.editor.text().is_empty() {
            Paragraph::new(Span::styled("Type or load text to speak (Ctrl+O)", palette.dim()))
        } else {
            Paragraph::new(self.editor.text()).style(palette.base()).scroll((scroll, 0))
        };
        frame.render_widget(body.block(block), area);

        if focused {
            frame.set_cursor_position(Position::new(
                inner.x + (col as u16).min(inner.width.saturating_sub(1)),
                inner.y + line as u16 - scroll,
            ));
        }
    }

    pub fn render_controls(&self, frame: &mut Frame, area: Rect, panel: &PanelState, palette: &Palette) {
        let block = palette.block("Voice", self.focus != Control::Text);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(1), // language
            Constraint::Length(1), // gender
            Constraint::Min(2),    // voices
            Constraint::Length(1), // rate
            Constraint::Length(1), // volume
            Constraint::Length(1), // pitch
            Constraint::Length(1), // playback
        ])
        .split(inner);

        let selection = &panel.selection;
        let language = selection
            .criteria
            .selected_lang
            .as_deref()
            .map(language_label)
            .unwrap_or_else(|| "No languages".to_string());
        self.render_choice(frame, rows[0], Control::Language, &language, palette);
        self.render_choice(frame, rows[1], Control::Gender, selection.criteria.gender.label(), palette);
        self.render_voice_list(frame, rows[2], panel, palette);

        let params = &panel.params;
        self.render_slider(
            frame,
            rows[3],
            Control::Rate,
            ratio(params.rate, RATE_MIN, RATE_MAX),
            params.rate_label(),
            palette,
        );
        self.render_slider(
            frame,
            rows[4],
            Control::Volume,
            ratio(params.volume, VOLUME_MIN, VOLUME_MAX),
            params.volume_label(),
            palette,
        );
        self.render_slider(
            frame,
            rows[5],
            Control::Pitch,
            ratio(params.pitch, PITCH_MIN, PITCH_MAX),
            params.pitch_label(),
            palette,
        );

        let (label, color) = match panel.playback_state() {
            PlaybackState::Idle => ("Idle", palette.text_muted),
            PlaybackState::Speaking => ("Speaking", palette.success),
            PlaybackState::Paused => ("Paused", palette.warning),
        };
        let mut spans = vec![Span::styled(" ", palette.base()), Span::styled(format!(" {label} "), palette.badge(color))];
        if !panel.controls_enabled {
            spans.push(Span::styled("  playback disabled", Style::default().fg(palette.error)));
        } else if panel.saving {
            spans.push(Span::styled("  saving…", palette.muted()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), rows[6]);
    }

    fn label_span(&self, control: Control, palette: &Palette) -> Span<'static> {
        let style = if self.focus == control {
            palette.highlight()
        } else {
            palette.muted()
        };
        Span::styled(format!(" {:<9}", control.label()), style)
    }

    fn render_choice(&self, frame: &mut Frame, area: Rect, control: Control, value: &str, palette: &Palette) {
        let focused = self.focus == control;
        let line = Line::from(vec![
            self.label_span(control, palette),
            Span::styled(if focused { "‹ " } else { "  " }, palette.dim()),
            Span::styled(value.to_string(), Style::default().fg(palette.text)),
            Span::styled(if focused { " ›" } else { "" }, palette.dim()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_voice_list(&self, frame: &mut Frame, area: Rect, panel: &PanelState, palette: &Palette) {
        let selection = &panel.selection;
        let items: Vec<ListItem> = selection
            .visible
            .iter()
            .map(|voice| ListItem::new(format!("   {}", voice.name)))
            .collect();

        if items.is_empty() {
            let message = if selection.catalog.is_empty() {
                "   No voices available"
            } else {
                "   No voices match"
            };
            frame.render_widget(Paragraph::new(Span::styled(message, palette.dim())), area);
            return;
        }

        let selected = selection
            .selected_voice
            .as_deref()
            .and_then(|name| selection.visible.iter().position(|v| v.name == name));
        let mut state = ListState::default().with_selected(selected);
        let highlight = if self.focus == Control::Voice {
            palette.highlight().add_modifier(Modifier::REVERSED)
        } else {
            palette.highlight()
        };
        let list = List::new(items)
            .style(Style::default().fg(palette.text))
            .highlight_style(highlight);
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_slider(
        &self,
        frame: &mut Frame,
        area: Rect,
        control: Control,
        ratio: f64,
        value: String,
        palette: &Palette,
    ) {
        let cols = Layout::horizontal([
            Constraint::Length(10),
            Constraint::Min(4),
            Constraint::Length(7),
        ])
        .split(area);
        frame.render_widget(Paragraph::new(self.label_span(control, palette)), cols[0]);
        let color = if self.focus == control { palette.accent } else { palette.primary };
        frame.render_widget(
            LineGauge::default()
                .filled_style(Style::default().fg(color))
                .unfilled_style(palette.dim())
                .label("")
                .ratio(ratio),
            cols[1],
        );
        frame.render_widget(Paragraph::new(format!(" {value}")).style(palette.muted()), cols[2]);
    }

    pub fn render_file_prompt(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let Some(prompt) = &self.file_prompt else {
            return;
        };
        let modal = centered_rect(60, 20, area);
        let block = palette.block("Open text file (.txt)", true);
        let inner = block.inner(modal);
        frame.render_widget(Clear, modal);
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(prompt.text().to_string()),
                Line::raw(""),
                Line::from(Span::styled("Enter: open   Esc: cancel", palette.dim())),
            ])
            .block(block),
            modal,
        );
        let col = prompt.text()[..prompt.cursor_position()].chars().count() as u16;
        frame.set_cursor_position(Position::new(
            inner.x + col.min(inner.width.saturating_sub(1)),
            inner.y,
        ));
    }
}

fn ratio(value: f32, min: f32, max: f32) -> f64 {
    (((value - min) / (max - min)) as f64).clamp(0.0, 1.0)
}

/// Keys for the list, choice and slider controls.
fn handle_control_key(control: Control, modifiers: KeyModifiers, code: KeyCode, panel: &PanelState) -> ViewResult {
    if modifiers != KeyModifiers::NONE {
        return ViewResult::Ignored;
    }
    let delta: i32 = match code {
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Down | KeyCode::Char('j') => 1,
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Up | KeyCode::Char('k') => -1,
        _ => return ViewResult::Ignored,
    };
    let sign = delta as f32;
    let selection = &panel.selection;
    let params = &panel.params;

    let msg = match control {
        Control::Text => return ViewResult::Ignored,
        Control::Language => {
            let current = selection
                .criteria
                .selected_lang
                .as_deref()
                .and_then(|lang| selection.languages.position(lang));
            let Some(idx) = step_index(current, selection.languages.len(), delta) else {
                return ViewResult::Consumed;
            };
            match selection.languages.get(idx) {
                Some(lang) => PanelMsg::SelectLanguage(lang.to_string()),
                None => return ViewResult::Consumed,
            }
        }
        Control::Gender => PanelMsg::SelectGender(if delta > 0 {
            selection.criteria.gender.next()
        } else {
            selection.criteria.gender.prev()
        }),
        Control::Voice => {
            let current = selection
                .selected_voice
                .as_deref()
                .and_then(|name| selection.visible.iter().position(|v| v.name == name));
            let Some(idx) = step_index(current, selection.visible.len(), delta) else {
                return ViewResult::Consumed;
            };
            PanelMsg::SelectVoice(selection.visible[idx].name.clone())
        }
        Control::Rate => PanelMsg::SetRate(params.rate + sign * RATE_STEP),
        Control::Volume => PanelMsg::SetVolume(params.volume + sign * VOLUME_STEP),
        Control::Pitch => PanelMsg::SetPitch(params.pitch + sign * PITCH_STEP),
    };
    ViewResult::Msg(msg)
}

/// Move `current` by `delta` within `0..len`, wrapping around.
fn step_index(current: Option<usize>, len: usize, delta: i32) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let len = len as i64;
    let current = current.map(|c| c as i64).unwrap_or(if delta > 0 { -1 } else { len });
    Some((current + i64::from(delta)).rem_euclid(len) as usize)
}
