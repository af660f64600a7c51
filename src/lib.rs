/// speakpanel - terminal text-to-speech control panel
///
/// Voice catalog and filtering, playback control over a local speech
/// engine, `.txt` loading, theme preferences and the `/save-text` service.

pub mod config;
pub mod core;
pub mod server;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
