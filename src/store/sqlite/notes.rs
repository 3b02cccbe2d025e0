//! NotesRepository implementation for SqliteStore.

use super::SqliteStore;
use super::rows::{
    ATTACHMENT_COLUMNS, NOTE_COLUMNS, attachment_from_row, note_from_row, note_tag_from_row,
    size_param, timestamp,
};
use crate::domain::{AppNote, Container, NoteAttachment, NoteId, NoteTag, Tag};
use crate::store::{NoteStats, NotesRepository, StoreError, StoreResult};
use rusqlite::{OptionalExtension, params};
use tracing::debug;

impl SqliteStore {
    fn note_exists(&self, id: &NoteId) -> StoreResult<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM notes WHERE id = ?", [id.as_str()], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn require_note(&self, id: &NoteId) -> StoreResult<()> {
        if self.note_exists(id)? {
            Ok(())
        } else {
            Err(StoreError::NoteNotFound { id: id.to_string() })
        }
    }
}

impl NotesRepository for SqliteStore {
    fn list_all(&self) -> StoreResult<Vec<AppNote>> {
        let sql = format!(
            "SELECT {} FROM notes ORDER BY updated_at DESC, id ASC",
            NOTE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let notes = stmt
            .query_map([], note_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    fn list_by_container(&self, container: &Container) -> StoreResult<Vec<AppNote>> {
        let sql = format!(
            "SELECT {} FROM notes WHERE container = ? ORDER BY updated_at DESC, id ASC",
            NOTE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let notes = stmt
            .query_map([container.as_str()], note_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    fn all_note_tag_names(&self) -> StoreResult<Vec<NoteTag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT note_id, tag_name FROM note_tags ORDER BY note_id, tag_name")?;
        let pairs = stmt
            .query_map([], note_tag_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pairs)
    }

    fn all_attachments(&self) -> StoreResult<Vec<NoteAttachment>> {
        let sql = format!(
            "SELECT {} FROM note_attachments ORDER BY note_id, display_name, id",
            ATTACHMENT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let attachments = stmt
            .query_map([], attachment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(attachments)
    }

    fn get_note(&self, id: &NoteId) -> StoreResult<Option<AppNote>> {
        let sql = format!("SELECT {} FROM notes WHERE id = ?", NOTE_COLUMNS);
        let note = self
            .conn
            .query_row(&sql, [id.as_str()], note_from_row)
            .optional()?;
        Ok(note)
    }

    fn upsert(&mut self, note: &AppNote) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO notes (id, title, body, citation, is_pinned, container, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                body = excluded.body,
                citation = excluded.citation,
                is_pinned = excluded.is_pinned,
                container = excluded.container,
                updated_at = excluded.updated_at",
            params![
                note.id().as_str(),
                note.title(),
                note.body(),
                note.citation(),
                note.is_pinned(),
                note.container().as_str(),
                timestamp(note.updated_at()),
            ],
        )?;
        debug!(id = %note.id(), container = %note.container(), "upserted note");
        self.notify_changed();
        Ok(())
    }

    fn toggle_pin(&mut self, id: &NoteId) -> StoreResult<bool> {
        let pinned = self
            .conn
            .query_row(
                "UPDATE notes SET is_pinned = 1 - is_pinned WHERE id = ? RETURNING is_pinned",
                [id.as_str()],
                |row| row.get::<_, bool>(0),
            )
            .optional()?
            .ok_or_else(|| StoreError::NoteNotFound { id: id.to_string() })?;

        debug!(%id, pinned, "toggled pin");
        self.notify_changed();
        Ok(pinned)
    }

    fn move_note(&mut self, id: &NoteId, container: &Container) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes SET container = ? WHERE id = ?",
            [container.as_str(), id.as_str()],
        )?;
        if changed == 0 {
            return Err(StoreError::NoteNotFound { id: id.to_string() });
        }

        debug!(%id, %container, "moved note");
        self.notify_changed();
        Ok(())
    }

    fn delete_by_id(&mut self, id: &NoteId) -> StoreResult<Vec<NoteAttachment>> {
        let attachments = self.attachments_for(id)?;

        let tx = self.transaction()?;
        let removed = tx.execute("DELETE FROM notes WHERE id = ?", [id.as_str()])?;
        tx.commit()?;

        if removed == 0 {
            return Ok(Vec::new());
        }
        debug!(%id, attachments = attachments.len(), "deleted note");
        Ok(attachments)
    }

    fn tags_for(&self, id: &NoteId) -> StoreResult<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT note_id, tag_name FROM note_tags WHERE note_id = ? ORDER BY tag_name")?;
        let tags = stmt
            .query_map([id.as_str()], note_tag_from_row)?
            .map(|pair| pair.map(|p| p.tag_name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn set_tags(&mut self, id: &NoteId, tags: &[Tag]) -> StoreResult<()> {
        self.require_note(id)?;

        let tx = self.transaction()?;
        tx.execute("DELETE FROM note_tags WHERE note_id = ?", [id.as_str()])?;
        for tag in tags {
            tx.execute(
                "INSERT OR IGNORE INTO note_tags (note_id, tag_name) VALUES (?, ?)",
                [id.as_str(), tag.as_str()],
            )?;
        }
        tx.commit()?;

        debug!(%id, count = tags.len(), "replaced tags");
        Ok(())
    }

    fn add_tag(&mut self, id: &NoteId, tag: &Tag) -> StoreResult<bool> {
        self.require_note(id)?;
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO note_tags (note_id, tag_name) VALUES (?, ?)",
            [id.as_str(), tag.as_str()],
        )?;
        if inserted > 0 {
            debug!(%id, %tag, "added tag");
            self.notify_changed();
        }
        Ok(inserted > 0)
    }

    fn remove_tag(&mut self, id: &NoteId, tag: &Tag) -> StoreResult<bool> {
        let removed = self.conn.execute(
            "DELETE FROM note_tags WHERE note_id = ? AND tag_name = ?",
            [id.as_str(), tag.as_str()],
        )?;
        if removed > 0 {
            debug!(%id, %tag, "removed tag");
            self.notify_changed();
        }
        Ok(removed > 0)
    }

    fn add_attachment(&mut self, attachment: &NoteAttachment) -> StoreResult<()> {
        self.require_note(&attachment.note_id)?;
        self.conn.execute(
            "INSERT INTO note_attachments
                (id, note_id, display_name, mime_type, size_bytes, storage_path)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                attachment.id,
                attachment.note_id.as_str(),
                attachment.display_name,
                attachment.mime_type,
                size_param(attachment.size_bytes)?,
                attachment.storage_path,
            ],
        )?;
        debug!(id = %attachment.id, note = %attachment.note_id, "added attachment");
        self.notify_changed();
        Ok(())
    }

    fn attachments_for(&self, id: &NoteId) -> StoreResult<Vec<NoteAttachment>> {
        let sql = format!(
            "SELECT {} FROM note_attachments WHERE note_id = ? ORDER BY display_name, id",
            ATTACHMENT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let attachments = stmt
            .query_map([id.as_str()], attachment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(attachments)
    }

    fn stats(&self) -> StoreResult<NoteStats> {
        let (notes, pinned): (i64, i64) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(is_pinned), 0) FROM notes",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        let attachments: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM note_attachments", [], |row| row.get(0))?;
        let tags: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT tag_name) FROM note_tags",
            [],
            |row| row.get(0),
        )?;

        Ok(NoteStats {
            notes: notes as usize,
            pinned: pinned as usize,
            attachments: attachments as usize,
            tags: tags as usize,
        })
    }
}
