//! Output format types for CLI commands.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use crate::domain::{AppNote, NoteAttachment, Tag};

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
}

/// Wrapper for serializable command output.
#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Output<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    /// Prints the wrapped data as pretty JSON.
    pub fn print(&self) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}

/// A single note in listing output.
#[derive(Debug, Serialize)]
pub struct NoteListing {
    pub id: String,
    pub title: String,
    pub container: String,
    pub pinned: bool,
    pub updated_at: String,
}

impl From<&AppNote> for NoteListing {
    fn from(note: &AppNote) -> Self {
        Self {
            id: note.id().to_string(),
            title: note.title().to_string(),
            container: note.container().to_string(),
            pinned: note.is_pinned(),
            updated_at: note.updated_at().to_rfc3339(),
        }
    }
}

/// A note with its tags and attachments.
#[derive(Debug, Serialize)]
pub struct NoteDetail<'a> {
    #[serde(flatten)]
    pub note: &'a AppNote,
    pub tags: &'a [Tag],
    pub attachments: &'a [NoteAttachment],
}
