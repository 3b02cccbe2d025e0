//! Case-insensitive tag type and the note/tag association.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::NoteId;

/// A case-insensitive tag name attached to notes.
///
/// Tags are flat labels. They are normalized to lowercase internally, making
/// `Fiqh`, `fiqh`, and `FIQH` equivalent.
///
/// # Validation Rules
/// - Non-empty after normalization
/// - Letters (any script), digits, hyphens, underscores and single inner spaces
///
/// # Normalization
/// - Surrounding whitespace is trimmed
/// - Inner whitespace runs collapse to one space
/// - Converted to lowercase
///
/// # Examples
///
/// ```
/// use corpus_vault::domain::Tag;
///
/// let tag = Tag::new("  Usul  al-Fiqh ").unwrap();
/// assert_eq!(tag.as_str(), "usul al-fiqh");
/// assert_eq!(tag, Tag::new("USUL AL-FIQH").unwrap());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String); // Always stored lowercase

/// Error returned when parsing an invalid tag.
#[derive(Debug, Clone)]
pub struct ParseTagError(String);

impl fmt::Display for ParseTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseTagError {}

impl Tag {
    /// Creates a new Tag from a string.
    ///
    /// # Errors
    ///
    /// Returns `ParseTagError` if the tag is empty after trimming or contains
    /// punctuation other than hyphens and underscores.
    pub fn new(s: &str) -> Result<Self, ParseTagError> {
        let normalized = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        if normalized.is_empty() {
            return Err(ParseTagError("tag cannot be empty".to_string()));
        }

        if !normalized
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == ' ')
        {
            return Err(ParseTagError(format!(
                "invalid tag '{}': tags may contain only letters, digits, spaces, hyphens, and underscores",
                normalized
            )));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized tag value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag(\"{}\")", self.0)
    }
}

impl FromStr for Tag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A single note-to-tag association.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteTag {
    pub note_id: NoteId,
    pub tag_name: Tag,
}

impl NoteTag {
    pub fn new(note_id: NoteId, tag_name: Tag) -> Self {
        Self { note_id, tag_name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn new_with_valid_tag() {
        let tag = Tag::new("aqeedah").unwrap();
        assert_eq!(tag.to_string(), "aqeedah");
    }

    #[test]
    fn new_rejects_empty_and_whitespace() {
        assert!(Tag::new("").is_err());
        assert!(Tag::new("   ").is_err());
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        let tag = Tag::new("  Hadith   Sciences ").unwrap();
        assert_eq!(tag.as_str(), "hadith sciences");
    }

    #[test]
    fn allows_non_latin_letters() {
        let tag = Tag::new("توحيد").unwrap();
        assert_eq!(tag.as_str(), "توحيد");
    }

    #[test]
    fn allows_hyphens_and_underscores() {
        assert!(Tag::new("usul-al-fiqh").is_ok());
        assert!(Tag::new("to_review").is_ok());
    }

    #[test]
    fn rejects_punctuation() {
        assert!(Tag::new("tag@home").is_err());
        assert!(Tag::new("a,b").is_err());
    }

    #[test]
    fn equal_after_normalization() {
        let mut set = HashSet::new();
        set.insert(Tag::new("Fiqh").unwrap());
        set.insert(Tag::new("FIQH").unwrap());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn deserialize_normalizes() {
        let tag: Tag = serde_json::from_str("\"Tafsir\"").unwrap();
        assert_eq!(tag.as_str(), "tafsir");
    }

    #[test]
    fn note_tag_serializes_camel_case() {
        let pair = NoteTag::new("n1".parse().unwrap(), Tag::new("fiqh").unwrap());
        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(json, r#"{"noteId":"n1","tagName":"fiqh"}"#);
    }
}
