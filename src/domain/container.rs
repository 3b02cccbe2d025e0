//! Container path type locating a note in the corpus hierarchy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label of the flat bucket for notes that are not filed under a scholar.
pub const GENERAL_NOTES: &str = "General Notes";

/// Separator between container path segments.
pub const SEPARATOR: &str = " > ";

/// The path identifying where a note lives.
///
/// Either the literal `General Notes` bucket or a path of display names such as
/// `Ibn Taymiyyah > Aqeedah` or `Ibn Taymiyyah > Aqeedah > Tawheed`. The path
/// is stored as text on the note, not as a reference, so renaming a category
/// leaves existing containers untouched.
///
/// # Normalization
/// - Segments are split on `>` and trimmed
/// - Inner whitespace runs collapse to one space
/// - Segments are rejoined with ` > `
///
/// # Examples
///
/// ```
/// use corpus_vault::domain::Container;
///
/// let c: Container = "Ibn Taymiyyah>Aqeedah".parse().unwrap();
/// assert_eq!(c.as_str(), "Ibn Taymiyyah > Aqeedah");
/// assert_eq!(c.segments(), vec!["Ibn Taymiyyah", "Aqeedah"]);
/// assert!(Container::general().is_general());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Container(String);

/// Error returned when parsing an invalid container path.
#[derive(Debug, Clone)]
pub struct ParseContainerError(String);

impl fmt::Display for ParseContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseContainerError {}

impl Container {
    /// Parses and normalizes a container path.
    ///
    /// # Errors
    ///
    /// Returns `ParseContainerError` if the path is blank or has an empty
    /// segment (e.g. `Scholar > > Category`).
    pub fn new(path: &str) -> Result<Self, ParseContainerError> {
        if path.trim().is_empty() {
            return Err(ParseContainerError(
                "container cannot be empty".to_string(),
            ));
        }

        let mut segments = Vec::new();
        for raw in path.split('>') {
            let seg = normalize_segment(raw);
            if seg.is_empty() {
                return Err(ParseContainerError(format!(
                    "invalid container '{}': path segments cannot be empty",
                    path.trim()
                )));
            }
            segments.push(seg);
        }

        Ok(Self(segments.join(SEPARATOR)))
    }

    /// The `General Notes` bucket.
    pub fn general() -> Self {
        Self(GENERAL_NOTES.to_string())
    }

    /// Container for notes filed directly under a scholar's category.
    pub fn category(scholar_name: &str, category_name: &str) -> Result<Self, ParseContainerError> {
        Self::from_segments(&[scholar_name, category_name])
    }

    /// Container for notes filed under a subcategory.
    pub fn subcategory(
        scholar_name: &str,
        category_name: &str,
        subcategory_name: &str,
    ) -> Result<Self, ParseContainerError> {
        Self::from_segments(&[scholar_name, category_name, subcategory_name])
    }

    fn from_segments(segments: &[&str]) -> Result<Self, ParseContainerError> {
        let mut normalized = Vec::with_capacity(segments.len());
        for seg in segments {
            let seg = normalize_segment(seg);
            if seg.is_empty() || seg.contains('>') {
                return Err(ParseContainerError(format!(
                    "invalid container segment '{}'",
                    seg
                )));
            }
            normalized.push(seg);
        }
        Ok(Self(normalized.join(SEPARATOR)))
    }

    /// Returns true for the `General Notes` bucket.
    pub fn is_general(&self) -> bool {
        self.0 == GENERAL_NOTES
    }

    /// Returns the path segments.
    pub fn segments(&self) -> Vec<&str> {
        self.0.split(SEPARATOR).collect()
    }

    /// Returns the number of path segments.
    pub fn depth(&self) -> usize {
        self.segments().len()
    }

    /// Returns the normalized path.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn normalize_segment(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl Default for Container {
    fn default() -> Self {
        Self::general()
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Container(\"{}\")", self.0)
    }
}

impl FromStr for Container {
    type Err = ParseContainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Container {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Container {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
