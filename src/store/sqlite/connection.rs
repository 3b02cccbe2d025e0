//! Connection management and change notification for SqliteStore.

use super::SqliteStore;
use super::transaction::Transaction;
use crate::store::{ChangeFeed, StoreError, StoreResult, create_schema};
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tokio::sync::watch;
use tracing::debug;

impl SqliteStore {
    // ===========================================
    // In-Memory Connection
    // ===========================================

    /// Opens an in-memory SQLite database with the vault schema.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    // ===========================================
    // File-Based Connection
    // ===========================================

    /// Opens or creates a SQLite database at the given path.
    ///
    /// Creates parent directories if they don't exist. Initializes the schema
    /// if this is a new database.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        debug!(path = %path.display(), "opening vault database");
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        create_schema(&conn)?;
        let (changes, _) = watch::channel(0);
        Ok(Self { conn, changes })
    }

    // ===========================================
    // Connection Accessors
    // ===========================================

    /// Returns a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // ===========================================
    // Transaction Support
    // ===========================================

    /// Begins a write transaction.
    pub fn transaction(&mut self) -> StoreResult<Transaction<'_>> {
        Transaction::begin(&self.conn, &self.changes)
    }

    // ===========================================
    // Change Notification
    // ===========================================

    /// The current store revision.
    pub fn revision(&self) -> u64 {
        *self.changes.borrow()
    }

    /// Subscribes to store changes.
    pub fn subscribe(&self) -> ChangeFeed {
        ChangeFeed::new(self.changes.subscribe())
    }

    /// Bumps the revision, waking every subscriber.
    pub(crate) fn notify_changed(&self) {
        self.changes.send_modify(|revision| *revision += 1);
    }
}
