//! Core types: scholars, categories, notes, tags, attachments, containers

mod attachment;
mod container;
mod corpus;
mod dataset;
mod display_mode;
mod note;
mod note_id;
mod search;
mod tag;
mod validate;
mod validation;

pub use attachment::{AttachmentFilter, NoteAttachment};
pub use container::{Container, GENERAL_NOTES, ParseContainerError, SEPARATOR};
pub use corpus::{Scholar, ScholarCategory, ScholarSubcategory, non_blank};
pub use dataset::{Dataset, DatasetCounts};
pub use display_mode::{NoteDisplayMode, ParseDisplayModeError, UiPrefs};
pub use note::{AppNote, AppNoteBuilder, UNTITLED};
pub use note_id::{NoteId, ParseNoteIdError};
pub use search::{NoteQuery, RECENT_LIMIT, group_tags, recent};
pub use tag::{NoteTag, ParseTagError, Tag};
pub use validate::{
    find_broken_references, find_duplicate_ids, find_missing_blobs, find_orphaned_containers,
    known_containers, validate_dataset,
};
pub use validation::{Severity, ValidationIssue, ValidationKind, ValidationSummary};
