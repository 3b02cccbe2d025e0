//! SQLite store, repository traits, live queries

mod live;
mod repository;
mod schema;
mod sqlite;

pub use live::{ChangeFeed, Live};
pub use repository::{
    CorpusRepository, NoteStats, NotesRepository, PrefsRepository, StoreError, StoreResult,
    StoreSnapshot,
};
pub use schema::{SCHEMA_VERSION, create_schema, get_schema_version};
pub use sqlite::{SqliteStore, Transaction};
