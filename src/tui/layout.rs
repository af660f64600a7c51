//! Root layout: text editor, control column and status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Width of the control column beside the text editor.
pub const CONTROLS_WIDTH: u16 = 40;
/// Stack the controls under the editor below this terminal width.
pub const STACK_THRESHOLD: u16 = 90;
/// Height of the stacked control area.
pub const STACKED_CONTROLS_HEIGHT: u16 = 16;

/// Computed layout regions for a single frame.
pub struct PanelLayout {
    pub text: Rect,
    pub controls: Rect,
    /// Status bar (bottom row).
    pub status: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    SideBySide,
    Stacked,
}

impl PanelLayout {
    pub fn compute(area: Rect) -> (Self, Arrangement) {
        let rows = Layout::vertical([
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);
        let content = rows[0];
        let status = rows[1];

        if area.width < STACK_THRESHOLD {
            let parts = Layout::vertical([
                Constraint::Min(3),
                Constraint::Length(STACKED_CONTROLS_HEIGHT),
            ])
            .split(content);
            (
                PanelLayout { text: parts[0], controls: parts[1], status },
                Arrangement::Stacked,
            )
        } else {
            let cols = Layout::horizontal([
                Constraint::Min(1),
                Constraint::Length(CONTROLS_WIDTH),
            ])
            .split(content);
            (
                PanelLayout { text: cols[0], controls: cols[1], status },
                Arrangement::SideBySide,
            )
        }
    }
}
