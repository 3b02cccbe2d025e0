//! Live query results bound to the store's change feed.

use super::{SqliteStore, StoreResult};
use std::fmt;
use tokio::sync::watch;

type Query<T> = Box<dyn Fn(&SqliteStore) -> StoreResult<T> + Send + Sync>;

/// A query result that knows the store revision it was read at.
///
/// Every store mutation bumps the revision. [`Live::refresh`] re-runs the
/// query only when the revision moved since the last read.
///
/// # Examples
///
/// ```
/// use corpus_vault::domain::AppNote;
/// use corpus_vault::store::{NotesRepository, SqliteStore};
///
/// let mut store = SqliteStore::open_in_memory().unwrap();
/// let mut notes = store.observe_all().unwrap();
/// assert!(notes.get().is_empty());
///
/// store.upsert(&AppNote::builder("Tawheed").build()).unwrap();
/// assert!(notes.refresh(&store).unwrap());
/// assert_eq!(notes.get().len(), 1);
/// ```
pub struct Live<T> {
    value: T,
    revision: u64,
    query: Query<T>,
}

impl<T> Live<T> {
    /// Runs `query` once and binds the result to the current revision.
    pub(crate) fn new<F>(store: &SqliteStore, query: F) -> StoreResult<Self>
    where
        F: Fn(&SqliteStore) -> StoreResult<T> + Send + Sync + 'static,
    {
        let revision = store.revision();
        let value = query(store)?;
        Ok(Self {
            value,
            revision,
            query: Box::new(query),
        })
    }

    /// The most recently read value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// The store revision the value was read at.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns true if the store changed since the value was read.
    pub fn is_stale(&self, store: &SqliteStore) -> bool {
        store.revision() != self.revision
    }

    /// Re-runs the query if the store changed. Returns whether it did.
    pub fn refresh(&mut self, store: &SqliteStore) -> StoreResult<bool> {
        if !self.is_stale(store) {
            return Ok(false);
        }
        let revision = store.revision();
        self.value = (self.query)(store)?;
        self.revision = revision;
        Ok(true)
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Live<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Live")
            .field("value", &self.value)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

/// Receiver side of the store's revision counter.
///
/// Sending never blocks, so the store works without an async runtime;
/// awaiting [`ChangeFeed::changed`] needs one.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    rx: watch::Receiver<u64>,
}

impl ChangeFeed {
    pub(crate) fn new(rx: watch::Receiver<u64>) -> Self {
        Self { rx }
    }

    /// The latest revision, without marking it seen.
    pub fn revision(&self) -> u64 {
        *self.rx.borrow()
    }

    /// Returns true if a change arrived since the last seen revision.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Marks the latest revision as seen and returns it.
    pub fn mark_seen(&mut self) -> u64 {
        *self.rx.borrow_and_update()
    }

    /// Waits for the next change and returns its revision.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<u64> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}
