//! Loading speech text from local files.
//!
//! Only `.txt` files are accepted. The extension is checked before the file
//! is opened, so a rejected path never touches the disk.

use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextFileError {
    #[error("Please select a text file (.txt)")]
    NotText,

    #[error("Error reading file: {0}")]
    Read(#[from] std::io::Error),
}

impl TextFileError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::NotText)
    }
}

/// Reject anything whose extension is not `txt` (case-insensitive).
pub fn check_text_file(path: &Path) -> Result<(), TextFileError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("txt") => Ok(()),
        _ => Err(TextFileError::NotText),
    }
}

/// Check, then read the whole file as UTF-8. Contents are returned verbatim.
pub async fn read_text_file(path: &Path) -> Result<String, TextFileError> {
    check_text_file(path)?;
    let text = tokio::fs::read_to_string(path).await?;
    log::debug!("Loaded {} bytes from {}", text.len(), path.display());
    Ok(text)
}

/// Expand a leading `~/` the way a shell would. Used by the path prompt.
pub fn expand_home(input: &str) -> std::path::PathBuf {
    let input = input.trim();
    match (input.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => std::path::PathBuf::from(input),
    }
}
