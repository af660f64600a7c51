//! Terminal front end for the speech panel.

pub mod app;
pub mod events;
pub mod layout;
pub mod services;
pub mod theme;
pub mod views;
pub mod widgets;

use std::io;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::panel::PanelState;

use app::AppState;
use services::Services;

/// Set up the terminal, run the panel until quit, then restore the terminal.
pub async fn run(config: &AppConfig) -> io::Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let services = Services::init(config, event_tx);
    let theme = services.preferences.load_theme();
    let panel = PanelState::new(config.speech.params(), theme);
    let mut app = AppState::new(panel, event_rx, services);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app
        .run(&mut terminal, Duration::from_millis(config.tui.tick_rate_ms))
        .await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
