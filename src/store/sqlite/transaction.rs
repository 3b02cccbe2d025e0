//! Write transactions that publish a store revision on commit.

use crate::store::StoreResult;
use rusqlite::{Connection, Params};
use std::cell::Cell;
use tokio::sync::watch;

/// A write transaction over the vault database.
///
/// Rolls back on drop unless [`Transaction::commit`] is called. Committing a
/// transaction that changed at least one row bumps the store revision, so
/// observers see a multi-statement write as a single change.
pub struct Transaction<'a> {
    conn: &'a Connection,
    changes: &'a watch::Sender<u64>,
    rows_changed: Cell<usize>,
    finished: bool,
}

impl<'a> Transaction<'a> {
    pub(crate) fn begin(conn: &'a Connection, changes: &'a watch::Sender<u64>) -> StoreResult<Self> {
        conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(Self {
            conn,
            changes,
            rows_changed: Cell::new(0),
            finished: false,
        })
    }

    pub(crate) fn conn(&self) -> &Connection {
        self.conn
    }

    /// Executes a statement, counting the rows it changed.
    pub fn execute(&self, sql: &str, params: impl Params) -> StoreResult<usize> {
        let n = self.conn.execute(sql, params)?;
        self.rows_changed.set(self.rows_changed.get() + n);
        Ok(n)
    }

    /// Commits, returning the number of rows changed.
    pub fn commit(mut self) -> StoreResult<usize> {
        self.conn.execute_batch("COMMIT")?;
        self.finished = true;
        let n = self.rows_changed.get();
        if n > 0 {
            self.changes.send_modify(|revision| *revision += 1);
        }
        Ok(n)
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            // Errors are ignored; nothing can be reported from drop
            let _ = self.conn.execute_batch("ROLLBACK");
        }
    }
}
