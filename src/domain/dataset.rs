//! A full in-memory copy of every table.

use serde::{Deserialize, Serialize};

use crate::domain::{AppNote, NoteAttachment, NoteTag, Scholar, ScholarCategory, ScholarSubcategory, UiPrefs};

/// Every row of every table plus the preference record.
///
/// Produced by a store snapshot, written into backups, and handed back to the
/// store for a full replacement on import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub scholars: Vec<Scholar>,
    #[serde(default)]
    pub categories: Vec<ScholarCategory>,
    #[serde(default)]
    pub subcategories: Vec<ScholarSubcategory>,
    #[serde(default)]
    pub notes: Vec<AppNote>,
    #[serde(default)]
    pub note_tags: Vec<NoteTag>,
    #[serde(default)]
    pub attachments: Vec<NoteAttachment>,
    #[serde(default)]
    pub prefs: UiPrefs,
}

impl Dataset {
    /// Returns true when no rows are present (prefs are ignored).
    pub fn is_empty(&self) -> bool {
        self.scholars.is_empty()
            && self.categories.is_empty()
            && self.subcategories.is_empty()
            && self.notes.is_empty()
            && self.note_tags.is_empty()
            && self.attachments.is_empty()
    }

    /// Row counts per table.
    pub fn counts(&self) -> DatasetCounts {
        DatasetCounts {
            scholars: self.scholars.len(),
            categories: self.categories.len(),
            subcategories: self.subcategories.len(),
            notes: self.notes.len(),
            note_tags: self.note_tags.len(),
            attachments: self.attachments.len(),
        }
    }

    /// Sorts every table into a canonical order, so two datasets holding the
    /// same rows compare equal.
    pub fn normalize(&mut self) {
        self.scholars.sort_by(|a, b| a.id.cmp(&b.id));
        self.categories.sort_by(|a, b| a.id.cmp(&b.id));
        self.subcategories.sort_by(|a, b| a.id.cmp(&b.id));
        self.notes.sort_by(|a, b| a.id().cmp(b.id()));
        self.note_tags
            .sort_by(|a, b| (&a.note_id, &a.tag_name).cmp(&(&b.note_id, &b.tag_name)));
        self.attachments.sort_by(|a, b| a.id.cmp(&b.id));
    }
}

/// Row counts of a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DatasetCounts {
    pub scholars: usize,
    pub categories: usize,
    pub subcategories: usize,
    pub notes: usize,
    pub note_tags: usize,
    pub attachments: usize,
}

impl std::fmt::Display for DatasetCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} scholars, {} categories, {} subcategories, {} notes, {} tags, {} attachments",
            self.scholars,
            self.categories,
            self.subcategories,
            self.notes,
            self.note_tags,
            self.attachments
        )
    }
}
