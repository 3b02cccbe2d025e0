//! Opaque note identifier with ULID generation and serde support.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use ulid::Ulid;

/// A unique identifier for notes.
///
/// Freshly created notes get a ULID (26-character Crockford Base32, sortable by
/// creation time). Any non-empty string without whitespace is accepted when
/// parsing, so identifiers from older backups (e.g. millisecond timestamps)
/// survive a round-trip unchanged.
///
/// # Examples
///
/// ```
/// use corpus_vault::domain::NoteId;
///
/// let id = NoteId::new();
/// assert_eq!(id.as_str().len(), 26);
///
/// let legacy: NoteId = "1718035200000".parse().unwrap();
/// assert_eq!(legacy.as_str(), "1718035200000");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(String);

impl NoteId {
    /// Creates a new NoteId from a fresh ULID.
    pub fn new() -> Self {
        Self(Ulid::new().to_string())
    }

    /// Returns a short prefix suitable for terminal display.
    ///
    /// ULIDs are cut to their first 10 characters (the timestamp part);
    /// shorter identifiers are returned whole.
    pub fn prefix(&self) -> &str {
        match self.0.char_indices().nth(10) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NoteId(\"{}\")", self.0)
    }
}

/// Error returned when parsing an invalid note identifier.
#[derive(Debug, Clone)]
pub struct ParseNoteIdError {
    value: String,
    reason: &'static str,
}

impl ParseNoteIdError {
    /// Returns the invalid value that caused this error.
    pub fn invalid_value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ParseNoteIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid note id '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for ParseNoteIdError {}

impl FromStr for NoteId {
    type Err = ParseNoteIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseNoteIdError {
                value: s.to_string(),
                reason: "id cannot be empty",
            });
        }
        if s.chars().any(char::is_whitespace) {
            return Err(ParseNoteIdError {
                value: s.to_string(),
                reason: "id cannot contain whitespace",
            });
        }
        Ok(Self(s.to_string()))
    }
}

impl Serialize for NoteId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
