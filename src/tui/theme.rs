//! Color palettes for the two panel themes.
//!
//! `Medieval` is the light parchment theme, `Space` the dark one. Views take
//! a [`Palette`] instead of using inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

use crate::core::preferences::ThemeName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Focused borders, active items.
    pub primary: Color,
    /// Calls to action, selected items.
    pub accent: Color,
    pub bg: Color,
    pub surface: Color,
    pub text: Color,
    pub text_muted: Color,
    pub text_dim: Color,
    pub error: Color,
    pub success: Color,
    pub warning: Color,
    pub info: Color,
}

// ── Medieval (light) ────────────────────────────────────────────────────────

pub const MEDIEVAL: Palette = Palette {
    primary: Color::Rgb(0x7B, 0x1E, 0x1E),
    accent: Color::Rgb(0xB8, 0x86, 0x0B),
    bg: Color::Rgb(0xF4, 0xEB, 0xD0),
    surface: Color::Rgb(0xE8, 0xDA, 0xB2),
    text: Color::Rgb(0x3B, 0x2A, 0x1A),
    text_muted: Color::Rgb(0x6E, 0x5B, 0x44),
    text_dim: Color::Rgb(0x9C, 0x8A, 0x6E),
    error: Color::Rgb(0xA3, 0x1F, 0x1F),
    success: Color::Rgb(0x3C, 0x6E, 0x2E),
    warning: Color::Rgb(0xB3, 0x5C, 0x00),
    info: Color::Rgb(0x2E, 0x4A, 0x7A),
};

// ── Space (dark) ────────────────────────────────────────────────────────────

pub const SPACE: Palette = Palette {
    primary: Color::Rgb(0x4F, 0xC3, 0xF7),
    accent: Color::Rgb(0xBA, 0x68, 0xC8),
    bg: Color::Rgb(0x0B, 0x0D, 0x1F),
    surface: Color::Rgb(0x15, 0x19, 0x33),
    text: Color::Rgb(0xE0, 0xE6, 0xF0),
    text_muted: Color::Rgb(0x8A, 0x93, 0xB0),
    text_dim: Color::Rgb(0x4A, 0x52, 0x70),
    error: Color::Rgb(0xEF, 0x53, 0x50),
    success: Color::Rgb(0x66, 0xBB, 0x6A),
    warning: Color::Rgb(0xFF, 0xA7, 0x26),
    info: Color::Rgb(0x42, 0xA5, 0xF5),
};

impl Palette {
    pub fn for_theme(theme: ThemeName) -> Palette {
        match theme {
            ThemeName::Medieval => MEDIEVAL,
            ThemeName::Space => SPACE,
        }
    }

    /// Base style for the whole frame.
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.bg)
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn heading(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn border_default(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    pub fn highlight(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    pub fn key_hint(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    /// Status bar brand badge.
    pub fn brand_badge(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn badge(&self, color: Color) -> Style {
        Style::default().fg(self.bg).bg(color).add_modifier(Modifier::BOLD)
    }

    /// A bordered block, styled by focus.
    pub fn block<'a>(&self, title: &'a str, focused: bool) -> Block<'a> {
        Block::default()
            .title(format!(" {title} "))
            .borders(Borders::ALL)
            .border_style(if focused {
                self.border_focused()
            } else {
                self.border_default()
            })
            .style(self.base())
    }
}
