pub mod logging;
pub mod panel;
pub mod preferences;
pub mod save;
pub mod text_file;
pub mod voice;
