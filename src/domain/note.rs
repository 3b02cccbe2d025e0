//! AppNote struct representing a note filed in a container.

use crate::domain::{Container, NoteId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Title given to notes created without one.
pub const UNTITLED: &str = "Untitled";

/// A note with its content and filing metadata.
///
/// # Fields
/// - `id`: Unique identifier
/// - `title`: Display title (blank titles become `Untitled`)
/// - `body`: Note text, plain or markdown
/// - `citation`: Source reference such as `Quran 2:153`
/// - `is_pinned`: Whether the note is pinned
/// - `container`: Where the note is filed
/// - `updated_at`: Last edit time
///
/// # Examples
///
/// ```
/// use corpus_vault::domain::{AppNote, Container};
///
/// let note = AppNote::builder("Tawheed")
///     .citation("Quran 2:153")
///     .container(Container::category("Ibn Taymiyyah", "Aqeedah").unwrap())
///     .build();
/// assert_eq!(note.title(), "Tawheed");
/// assert!(!note.is_pinned());
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppNote {
    id: NoteId,
    title: String,
    #[serde(alias = "preview", default)]
    body: String,
    #[serde(default)]
    citation: String,
    #[serde(default)]
    is_pinned: bool,
    #[serde(default)]
    container: Container,
    updated_at: DateTime<Utc>,
}

impl AppNote {
    /// Creates a builder for a new note with a fresh id.
    pub fn builder(title: impl Into<String>) -> AppNoteBuilder {
        AppNoteBuilder::new(NoteId::new(), title)
    }

    /// Creates a builder for a note with a known id.
    pub fn builder_with_id(id: NoteId, title: impl Into<String>) -> AppNoteBuilder {
        AppNoteBuilder::new(id, title)
    }

    /// Returns the note's unique identifier.
    pub fn id(&self) -> &NoteId {
        &self.id
    }

    /// Returns the note's title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the note's body text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the note's citation (may be empty).
    pub fn citation(&self) -> &str {
        &self.citation
    }

    /// Returns whether the note is pinned.
    pub fn is_pinned(&self) -> bool {
        self.is_pinned
    }

    /// Returns the container the note is filed in.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Returns when the note was last edited.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the title. Blank titles become `Untitled`.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = normalize_title(title.into());
    }

    /// Replaces the body text.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    /// Replaces the citation. Surrounding whitespace is trimmed.
    pub fn set_citation(&mut self, citation: impl Into<String>) {
        self.citation = citation.into().trim().to_string();
    }

    pub fn set_pinned(&mut self, pinned: bool) {
        self.is_pinned = pinned;
    }

    pub fn set_container(&mut self, container: Container) {
        self.container = container;
    }

    /// Stamps the note as edited now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn normalize_title(title: String) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}

impl fmt::Display for AppNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.id.prefix())
    }
}

impl fmt::Debug for AppNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppNote")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("citation", &self.citation)
            .field("is_pinned", &self.is_pinned)
            .field("container", &self.container)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Builder for constructing an AppNote.
pub struct AppNoteBuilder {
    id: NoteId,
    title: String,
    body: String,
    citation: String,
    is_pinned: bool,
    container: Container,
    updated_at: Option<DateTime<Utc>>,
}

impl AppNoteBuilder {
    fn new(id: NoteId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            body: String::new(),
            citation: String::new(),
            is_pinned: false,
            container: Container::general(),
            updated_at: None,
        }
    }

    /// Sets the body text.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the citation.
    pub fn citation(mut self, citation: impl Into<String>) -> Self {
        self.citation = citation.into();
        self
    }

    /// Sets the pinned flag.
    pub fn pinned(mut self, pinned: bool) -> Self {
        self.is_pinned = pinned;
        self
    }

    /// Sets the container. Defaults to `General Notes`.
    pub fn container(mut self, container: Container) -> Self {
        self.container = container;
        self
    }

    /// Sets the last edit time. Defaults to now.
    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Builds the note.
    pub fn build(self) -> AppNote {
        AppNote {
            id: self.id,
            title: normalize_title(self.title),
            body: self.body,
            citation: self.citation.trim().to_string(),
            is_pinned: self.is_pinned,
            container: self.container,
            updated_at: self.updated_at.unwrap_or_else(Utc::now),
        }
    }
}
