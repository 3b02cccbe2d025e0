//! PrefsRepository implementation for SqliteStore.

use super::SqliteStore;
use crate::domain::NoteDisplayMode;
use crate::store::{PrefsRepository, StoreError, StoreResult};
use rusqlite::OptionalExtension;
use tracing::debug;

impl PrefsRepository for SqliteStore {
    fn display_mode(&self) -> StoreResult<NoteDisplayMode> {
        let stored: Option<String> = self
            .conn
            .query_row("SELECT display_mode FROM ui_prefs WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        match stored {
            None => Ok(NoteDisplayMode::default()),
            Some(value) => value
                .parse()
                .map_err(|e| StoreError::InvalidData(format!("display mode: {}", e))),
        }
    }

    fn set_display_mode(&mut self, mode: NoteDisplayMode) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO ui_prefs (id, display_mode) VALUES (1, ?)
             ON CONFLICT(id) DO UPDATE SET display_mode = excluded.display_mode",
            [mode.as_str()],
        )?;
        debug!(mode = %mode, "set display mode");
        self.notify_changed();
        Ok(())
    }
}
