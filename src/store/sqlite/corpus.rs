//! CorpusRepository implementation for SqliteStore.

use super::SqliteStore;
use super::rows::{category_from_row, scholar_from_row, subcategory_from_row};
use crate::domain::{Scholar, ScholarCategory, ScholarSubcategory};
use crate::store::{CorpusRepository, StoreError, StoreResult};
use rusqlite::{OptionalExtension, params};
use tracing::debug;

impl SqliteStore {
    fn category_named(&self, scholar_id: &str, name: &str) -> StoreResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM scholar_categories WHERE scholar_id = ? AND name = ? LIMIT 1",
                [scholar_id, name],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

impl CorpusRepository for SqliteStore {
    fn list_scholars(&self) -> StoreResult<Vec<Scholar>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, era, madhhab FROM scholars ORDER BY name COLLATE NOCASE, id",
        )?;
        let scholars = stmt
            .query_map([], scholar_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(scholars)
    }

    fn get_scholar(&self, id: &str) -> StoreResult<Option<Scholar>> {
        let scholar = self
            .conn
            .query_row(
                "SELECT id, name, era, madhhab FROM scholars WHERE id = ?",
                [id],
                scholar_from_row,
            )
            .optional()?;
        Ok(scholar)
    }

    fn list_categories(&self, scholar_id: &str) -> StoreResult<Vec<ScholarCategory>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, scholar_id, name FROM scholar_categories
             WHERE scholar_id = ? ORDER BY name COLLATE NOCASE, id",
        )?;
        let categories = stmt
            .query_map([scholar_id], category_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    fn list_subcategories(
        &self,
        scholar_id: &str,
        category_name: &str,
    ) -> StoreResult<Vec<ScholarSubcategory>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, scholar_id, category_name, name FROM scholar_subcategories
             WHERE scholar_id = ? AND category_name = ? ORDER BY name COLLATE NOCASE, id",
        )?;
        let subcategories = stmt
            .query_map([scholar_id, category_name], subcategory_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(subcategories)
    }

    fn all_categories(&self) -> StoreResult<Vec<ScholarCategory>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, scholar_id, name FROM scholar_categories ORDER BY id")?;
        let categories = stmt
            .query_map([], category_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    fn all_subcategories(&self) -> StoreResult<Vec<ScholarSubcategory>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, scholar_id, category_name, name FROM scholar_subcategories ORDER BY id",
        )?;
        let subcategories = stmt
            .query_map([], subcategory_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(subcategories)
    }

    fn upsert_scholar(&mut self, scholar: &Scholar) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO scholars (id, name, era, madhhab) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                era = excluded.era,
                madhhab = excluded.madhhab",
            params![scholar.id, scholar.name, scholar.era, scholar.madhhab],
        )?;
        debug!(id = %scholar.id, "upserted scholar");
        self.notify_changed();
        Ok(())
    }

    fn upsert_category(&mut self, category: &ScholarCategory) -> StoreResult<()> {
        if self.get_scholar(&category.scholar_id)?.is_none() {
            return Err(StoreError::InvalidReference(format!(
                "category '{}' references missing scholar '{}'",
                category.id, category.scholar_id
            )));
        }

        let previous_name: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM scholar_categories WHERE id = ?",
                [category.id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        let tx = self.transaction()?;
        tx.execute(
            "INSERT INTO scholar_categories (id, scholar_id, name) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                scholar_id = excluded.scholar_id,
                name = excluded.name",
            params![category.id, category.scholar_id, category.name],
        )?;

        // A rename carries subcategories along unless another category of the
        // same scholar still holds the old name
        if let Some(old) = previous_name.filter(|old| *old != category.name) {
            let still_named: i64 = tx.conn().query_row(
                "SELECT COUNT(*) FROM scholar_categories WHERE scholar_id = ? AND name = ?",
                [category.scholar_id.as_str(), old.as_str()],
                |row| row.get(0),
            )?;
            if still_named == 0 {
                let moved = tx.execute(
                    "UPDATE scholar_subcategories SET category_name = ?
                     WHERE scholar_id = ? AND category_name = ?",
                    [
                        category.name.as_str(),
                        category.scholar_id.as_str(),
                        old.as_str(),
                    ],
                )?;
                debug!(id = %category.id, from = %old, to = %category.name, moved, "renamed category");
            }
        }
        tx.commit()?;

        debug!(id = %category.id, "upserted category");
        Ok(())
    }

    fn upsert_subcategory(&mut self, subcategory: &ScholarSubcategory) -> StoreResult<()> {
        if !self.category_named(&subcategory.scholar_id, &subcategory.category_name)? {
            return Err(StoreError::InvalidReference(format!(
                "subcategory '{}' references missing category '{}' of scholar '{}'",
                subcategory.id, subcategory.category_name, subcategory.scholar_id
            )));
        }

        self.conn.execute(
            "INSERT INTO scholar_subcategories (id, scholar_id, category_name, name)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                scholar_id = excluded.scholar_id,
                category_name = excluded.category_name,
                name = excluded.name",
            params![
                subcategory.id,
                subcategory.scholar_id,
                subcategory.category_name,
                subcategory.name
            ],
        )?;
        debug!(id = %subcategory.id, "upserted subcategory");
        self.notify_changed();
        Ok(())
    }
}
