//! SQLite-backed vault store implementation.

mod connection;
mod corpus;
mod notes;
mod observe;
mod prefs;
mod rows;
mod snapshot;
mod transaction;


use rusqlite::Connection;
use tokio::sync::watch;

pub use transaction::Transaction;

// ===========================================
// SqliteStore Struct
// ===========================================

/// SQLite-backed vault store.
///
/// Owns the database connection and the revision counter that live views and
/// change feeds observe. Every successful mutation bumps the revision.
pub struct SqliteStore {
    pub(crate) conn: Connection,
    changes: watch::Sender<u64>,
}
