//! Whole-store snapshot and all-or-nothing replacement.

use super::SqliteStore;
use super::rows::{size_param, timestamp};
use crate::domain::{UiPrefs, find_broken_references, find_duplicate_ids};
use crate::store::{
    CorpusRepository, NotesRepository, PrefsRepository, StoreError, StoreResult, StoreSnapshot,
};
use rusqlite::params;
use tracing::{debug, info};

impl SqliteStore {
    /// Reads every row of every table plus the preference record.
    pub fn snapshot(&self) -> StoreResult<StoreSnapshot> {
        Ok(StoreSnapshot {
            scholars: self.list_scholars()?,
            categories: self.all_categories()?,
            subcategories: self.all_subcategories()?,
            notes: self.list_all()?,
            note_tags: self.all_note_tag_names()?,
            attachments: self.all_attachments()?,
            prefs: UiPrefs {
                display_mode: self.display_mode()?,
            },
        })
    }

    /// Replaces the entire contents of the store with `snapshot`.
    ///
    /// Runs in one transaction: either every table is replaced or nothing
    /// changes. Duplicate ids and rows pointing at missing parents are
    /// rejected with `InvalidReference` before anything is written.
    pub fn replace_all(&mut self, snapshot: &StoreSnapshot) -> StoreResult<()> {
        let problems: Vec<String> = find_duplicate_ids(snapshot)
            .into_iter()
            .chain(find_broken_references(snapshot))
            .map(|issue| issue.to_string())
            .collect();
        if !problems.is_empty() {
            return Err(StoreError::InvalidReference(problems.join("; ")));
        }

        let tx = self.transaction()?;

        // Children first, foreign keys stay satisfied at every step
        for table in [
            "note_tags",
            "note_attachments",
            "notes",
            "scholar_subcategories",
            "scholar_categories",
            "scholars",
            "ui_prefs",
        ] {
            tx.execute(&format!("DELETE FROM {}", table), [])?;
        }

        for scholar in &snapshot.scholars {
            tx.execute(
                "INSERT INTO scholars (id, name, era, madhhab) VALUES (?1, ?2, ?3, ?4)",
                params![scholar.id, scholar.name, scholar.era, scholar.madhhab],
            )?;
        }
        for category in &snapshot.categories {
            tx.execute(
                "INSERT INTO scholar_categories (id, scholar_id, name) VALUES (?1, ?2, ?3)",
                params![category.id, category.scholar_id, category.name],
            )?;
        }
        for sub in &snapshot.subcategories {
            tx.execute(
                "INSERT INTO scholar_subcategories (id, scholar_id, category_name, name)
                 VALUES (?1, ?2, ?3, ?4)",
                params![sub.id, sub.scholar_id, sub.category_name, sub.name],
            )?;
        }
        for note in &snapshot.notes {
            tx.execute(
                "INSERT INTO notes (id, title, body, citation, is_pinned, container, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
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
        }
        for pair in &snapshot.note_tags {
            tx.execute(
                "INSERT OR IGNORE INTO note_tags (note_id, tag_name) VALUES (?, ?)",
                [pair.note_id.as_str(), pair.tag_name.as_str()],
            )?;
        }
        for attachment in &snapshot.attachments {
            tx.execute(
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
        }
        tx.execute(
            "INSERT INTO ui_prefs (id, display_mode) VALUES (1, ?)",
            [snapshot.prefs.display_mode.as_str()],
        )?;

        tx.commit()?;

        info!(counts = %snapshot.counts(), "replaced store contents");
        Ok(())
    }

    /// Deletes every row and resets preferences.
    pub fn wipe(&mut self) -> StoreResult<()> {
        debug!("wiping store");
        self.replace_all(&StoreSnapshot::default())
    }
}
