//! Row <-> domain conversions shared by the SqliteStore impls.

use crate::domain::{
    AppNote, Container, NoteAttachment, NoteId, NoteTag, Scholar, ScholarCategory,
    ScholarSubcategory, Tag,
};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use rusqlite::types::Type;
use std::error::Error;

pub(super) const NOTE_COLUMNS: &str =
    "id, title, body, citation, is_pinned, container, updated_at";

pub(super) const ATTACHMENT_COLUMNS: &str =
    "id, note_id, display_name, mime_type, size_bytes, storage_path";

/// Formats a timestamp with fixed-width nanoseconds, so text order is time order.
pub(super) fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn conversion<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn note_id(row: &Row<'_>, idx: usize) -> rusqlite::Result<NoteId> {
    row.get::<_, String>(idx)?
        .parse()
        .map_err(|e| conversion(idx, e))
}

/// Maps a row selected with [`NOTE_COLUMNS`].
pub(super) fn note_from_row(row: &Row<'_>) -> rusqlite::Result<AppNote> {
    let id = note_id(row, 0)?;
    let container: Container = row
        .get::<_, String>(5)?
        .parse()
        .map_err(|e| conversion(5, e))?;
    let updated_at = DateTime::parse_from_rfc3339(&row.get::<_, String>(6)?)
        .map_err(|e| conversion(6, e))?
        .with_timezone(&Utc);

    Ok(AppNote::builder_with_id(id, row.get::<_, String>(1)?)
        .body(row.get::<_, String>(2)?)
        .citation(row.get::<_, String>(3)?)
        .pinned(row.get::<_, bool>(4)?)
        .container(container)
        .updated_at(updated_at)
        .build())
}

/// Maps a `(note_id, tag_name)` row.
pub(super) fn note_tag_from_row(row: &Row<'_>) -> rusqlite::Result<NoteTag> {
    let note_id = note_id(row, 0)?;
    let tag = Tag::new(&row.get::<_, String>(1)?).map_err(|e| conversion(1, e))?;
    Ok(NoteTag::new(note_id, tag))
}

/// Maps a row selected with [`ATTACHMENT_COLUMNS`].
pub(super) fn attachment_from_row(row: &Row<'_>) -> rusqlite::Result<NoteAttachment> {
    let size: i64 = row.get(4)?;
    let size_bytes = u64::try_from(size).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, Type::Integer, Box::new(e))
    })?;
    Ok(NoteAttachment {
        id: row.get(0)?,
        note_id: note_id(row, 1)?,
        display_name: row.get(2)?,
        mime_type: row.get(3)?,
        size_bytes,
        storage_path: row.get(5)?,
    })
}

/// Converts an attachment size for storage.
pub(super) fn size_param(size_bytes: u64) -> rusqlite::Result<i64> {
    i64::try_from(size_bytes).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

pub(super) fn scholar_from_row(row: &Row<'_>) -> rusqlite::Result<Scholar> {
    Ok(Scholar {
        id: row.get(0)?,
        name: row.get(1)?,
        era: row.get(2)?,
        madhhab: row.get(3)?,
    })
}

pub(super) fn category_from_row(row: &Row<'_>) -> rusqlite::Result<ScholarCategory> {
    Ok(ScholarCategory {
        id: row.get(0)?,
        scholar_id: row.get(1)?,
        name: row.get(2)?,
    })
}

pub(super) fn subcategory_from_row(row: &Row<'_>) -> rusqlite::Result<ScholarSubcategory> {
    Ok(ScholarSubcategory {
        id: row.get(0)?,
        scholar_id: row.get(1)?,
        category_name: row.get(2)?,
        name: row.get(3)?,
    })
}
