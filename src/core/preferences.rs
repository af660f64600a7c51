//! Persisted user preferences (`preferences.json` in the data directory).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Error, Debug)]
pub enum PreferencesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Panel theme. `medieval` is the light theme, `space` the dark one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    #[serde(alias = "light")]
    Medieval,
    #[serde(alias = "dark")]
    Space,
}

impl ThemeName {
    pub fn toggled(self) -> Self {
        match self {
            Self::Medieval => Self::Space,
            Self::Space => Self::Medieval,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Medieval => "medieval",
            Self::Space => "space",
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Space
    }
}

impl std::fmt::Display for ThemeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(default)]
    theme: ThemeName,
}

/// Reads and writes the preferences file.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<data_dir>/preferences.json`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(PREFERENCES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved theme, or the default when the file is missing or unreadable.
    pub fn load_theme(&self) -> ThemeName {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No preferences at {}, using defaults", self.path.display());
                return ThemeName::default();
            }
            Err(e) => {
                log::warn!("Failed to read {}: {e}", self.path.display());
                return ThemeName::default();
            }
        };
        match serde_json::from_str::<Preferences>(&contents) {
            Ok(prefs) => prefs.theme,
            Err(e) => {
                log::warn!("Ignoring corrupt preferences at {}: {e}", self.path.display());
                ThemeName::default()
            }
        }
    }

    pub async fn save_theme(&self, theme: ThemeName) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&Preferences { theme })?;
        tokio::fs::write(&self.path, json).await?;
        log::debug!("Saved theme '{theme}' to {}", self.path.display());
        Ok(())
    }
}
