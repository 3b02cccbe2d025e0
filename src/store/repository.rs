//! Repository traits and store error types.

use crate::domain::{
    AppNote, Container, Dataset, NoteAttachment, NoteDisplayMode, NoteId, NoteTag, Scholar,
    ScholarCategory, ScholarSubcategory, Tag,
};
use crate::infra::{
    CATEGORY_FALLBACK, SCHOLAR_FALLBACK, SUBCATEGORY_FALLBACK, child_slug, slugify, unique_slug,
};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

// ===========================================
// StoreError Type
// ===========================================

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested note does not exist.
    #[error("note not found: {id}")]
    NoteNotFound { id: String },

    /// A row names a parent that does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// A required name was blank.
    #[error("{kind} name must not be empty")]
    EmptyName { kind: &'static str },

    /// A name contains the container path separator.
    #[error("{kind} name '{name}' must not contain '>'")]
    InvalidName { kind: &'static str, name: String },

    /// A stored value could not be parsed back into a domain type.
    #[error("invalid data in database: {0}")]
    InvalidData(String),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An I/O error occurred.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Every table's rows, as read by `snapshot` and written by `replace_all`.
pub type StoreSnapshot = Dataset;

// ===========================================
// NoteStats
// ===========================================

/// Row counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NoteStats {
    pub notes: usize,
    pub pinned: usize,
    pub attachments: usize,
    /// Distinct tag names in use.
    pub tags: usize,
}

// ===========================================
// NotesRepository Trait
// ===========================================

/// Notes with their tags and attachment metadata.
pub trait NotesRepository {
    /// Lists every note, most recently updated first (ties by id).
    fn list_all(&self) -> StoreResult<Vec<AppNote>>;

    /// Lists notes filed exactly under `container`, same ordering as `list_all`.
    fn list_by_container(&self, container: &Container) -> StoreResult<Vec<AppNote>>;

    /// Every note/tag pair, ordered by note id then tag.
    fn all_note_tag_names(&self) -> StoreResult<Vec<NoteTag>>;

    /// Every attachment, ordered by note id then display name.
    fn all_attachments(&self) -> StoreResult<Vec<NoteAttachment>>;

    /// Retrieves a single note by id.
    fn get_note(&self, id: &NoteId) -> StoreResult<Option<AppNote>>;

    /// Inserts or replaces the note row exactly as given.
    ///
    /// Tags and attachments of an existing note are kept.
    fn upsert(&mut self, note: &AppNote) -> StoreResult<()>;

    /// Flips the pinned flag and returns the new value.
    fn toggle_pin(&mut self, id: &NoteId) -> StoreResult<bool>;

    /// Refiles a note. Nothing but the container changes.
    fn move_note(&mut self, id: &NoteId, container: &Container) -> StoreResult<()>;

    /// Deletes a note with its tags and attachment rows.
    ///
    /// Returns the removed attachments so their files can be deleted. A missing
    /// note yields an empty list.
    fn delete_by_id(&mut self, id: &NoteId) -> StoreResult<Vec<NoteAttachment>>;

    /// Tags of one note, sorted.
    fn tags_for(&self, id: &NoteId) -> StoreResult<Vec<Tag>>;

    /// Replaces every tag of a note.
    fn set_tags(&mut self, id: &NoteId, tags: &[Tag]) -> StoreResult<()>;

    /// Adds a tag. Returns `false` if the note already had it.
    fn add_tag(&mut self, id: &NoteId, tag: &Tag) -> StoreResult<bool>;

    /// Removes a tag. Returns `false` if the note did not have it.
    fn remove_tag(&mut self, id: &NoteId, tag: &Tag) -> StoreResult<bool>;

    /// Records attachment metadata. The note must exist.
    fn add_attachment(&mut self, attachment: &NoteAttachment) -> StoreResult<()>;

    /// Attachments of one note, ordered by display name.
    fn attachments_for(&self, id: &NoteId) -> StoreResult<Vec<NoteAttachment>>;

    /// Dashboard counts.
    fn stats(&self) -> StoreResult<NoteStats>;
}

// ===========================================
// CorpusRepository Trait
// ===========================================

/// The scholar, category, and subcategory hierarchy.
pub trait CorpusRepository {
    /// Lists scholars ordered by name, case-insensitively.
    fn list_scholars(&self) -> StoreResult<Vec<Scholar>>;

    fn get_scholar(&self, id: &str) -> StoreResult<Option<Scholar>>;

    /// Lists one scholar's categories ordered by name.
    fn list_categories(&self, scholar_id: &str) -> StoreResult<Vec<ScholarCategory>>;

    /// Lists the subcategories of one category ordered by name.
    fn list_subcategories(
        &self,
        scholar_id: &str,
        category_name: &str,
    ) -> StoreResult<Vec<ScholarSubcategory>>;

    /// Every category of every scholar, ordered by id.
    fn all_categories(&self) -> StoreResult<Vec<ScholarCategory>>;

    /// Every subcategory, ordered by id.
    fn all_subcategories(&self) -> StoreResult<Vec<ScholarSubcategory>>;

    fn upsert_scholar(&mut self, scholar: &Scholar) -> StoreResult<()>;

    /// Fails with `InvalidReference` if the scholar does not exist.
    fn upsert_category(&mut self, category: &ScholarCategory) -> StoreResult<()>;

    /// Fails with `InvalidReference` if the `(scholar_id, category_name)` pair
    /// names no category.
    fn upsert_subcategory(&mut self, subcategory: &ScholarSubcategory) -> StoreResult<()>;

    /// Creates a scholar from form input, deriving a unique slug id.
    fn add_scholar(
        &mut self,
        name: &str,
        era: Option<&str>,
        madhhab: Option<&str>,
    ) -> StoreResult<Scholar> {
        let name = required_name(name, "scholar")?;
        let taken: HashSet<String> = self.list_scholars()?.into_iter().map(|s| s.id).collect();
        let id = unique_slug(&slugify(name, SCHOLAR_FALLBACK), |c| taken.contains(c));

        let scholar = Scholar::new(id, name, era, madhhab);
        self.upsert_scholar(&scholar)?;
        Ok(scholar)
    }

    /// Creates a category under `scholar_id`, id `{scholar_id}_{slug}`.
    fn add_category(&mut self, scholar_id: &str, name: &str) -> StoreResult<ScholarCategory> {
        let name = required_name(name, "category")?;
        if self.get_scholar(scholar_id)?.is_none() {
            return Err(StoreError::InvalidReference(format!(
                "scholar '{}' does not exist",
                scholar_id
            )));
        }
        let taken: HashSet<String> = self.all_categories()?.into_iter().map(|c| c.id).collect();
        let base = child_slug(scholar_id, &[name], CATEGORY_FALLBACK);
        let id = unique_slug(&base, |c| taken.contains(c));

        let category = ScholarCategory::new(id, scholar_id, name);
        self.upsert_category(&category)?;
        Ok(category)
    }

    /// Creates a subcategory, id `{scholar_id}_{category slug}_{slug}`.
    fn add_subcategory(
        &mut self,
        scholar_id: &str,
        category_name: &str,
        name: &str,
    ) -> StoreResult<ScholarSubcategory> {
        let name = required_name(name, "subcategory")?;
        let category_name = category_name.trim();
        let taken: HashSet<String> = self
            .all_subcategories()?
            .into_iter()
            .map(|s| s.id)
            .collect();
        let base = format!(
            "{}_{}",
            child_slug(scholar_id, &[category_name], CATEGORY_FALLBACK),
            slugify(name, SUBCATEGORY_FALLBACK)
        );
        let id = unique_slug(&base, |c| taken.contains(c));

        let subcategory = ScholarSubcategory::new(id, scholar_id, category_name, name);
        self.upsert_subcategory(&subcategory)?;
        Ok(subcategory)
    }
}

fn required_name<'a>(name: &'a str, kind: &'static str) -> StoreResult<&'a str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyName { kind });
    }
    // Names become container path segments
    if trimmed.contains('>') {
        return Err(StoreError::InvalidName {
            kind,
            name: trimmed.to_string(),
        });
    }
    Ok(trimmed)
}

// ===========================================
// PrefsRepository Trait
// ===========================================

/// The persisted UI preference record.
pub trait PrefsRepository {
    /// The note display mode, `List` when never set.
    fn display_mode(&self) -> StoreResult<NoteDisplayMode>;

    fn set_display_mode(&mut self, mode: NoteDisplayMode) -> StoreResult<()>;
}
