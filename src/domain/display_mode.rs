//! Note display preference.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How note collections are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteDisplayMode {
    #[default]
    List,
    Icons,
    Grid,
    Book,
}

impl NoteDisplayMode {
    pub const ALL: [NoteDisplayMode; 4] = [
        NoteDisplayMode::List,
        NoteDisplayMode::Icons,
        NoteDisplayMode::Grid,
        NoteDisplayMode::Book,
    ];

    /// Stable storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteDisplayMode::List => "list",
            NoteDisplayMode::Icons => "icons",
            NoteDisplayMode::Grid => "grid",
            NoteDisplayMode::Book => "book",
        }
    }

    /// Human label.
    pub fn label(&self) -> &'static str {
        match self {
            NoteDisplayMode::List => "List",
            NoteDisplayMode::Icons => "Icons",
            NoteDisplayMode::Grid => "Grid",
            NoteDisplayMode::Book => "Book",
        }
    }
}

/// Error returned when parsing an unknown display mode.
#[derive(Debug, Clone)]
pub struct ParseDisplayModeError(String);

impl fmt::Display for ParseDisplayModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown display mode '{}': expected list, icons, grid, or book",
            self.0
        )
    }
}

impl std::error::Error for ParseDisplayModeError {}

impl fmt::Display for NoteDisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NoteDisplayMode {
    type Err = ParseDisplayModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == key)
            .ok_or_else(|| ParseDisplayModeError(s.trim().to_string()))
    }
}

/// Persisted UI preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiPrefs {
    #[serde(default)]
    pub display_mode: NoteDisplayMode,
}
