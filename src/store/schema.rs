//! SQLite schema creation for the vault store.

use rusqlite::Connection;

/// Current schema version recorded in `schema_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// Creates the database schema.
///
/// Idempotent: every statement is `IF NOT EXISTS`.
///
/// # Tables Created
/// - `scholars` - Scholars keyed by slug id
/// - `scholar_categories` - Categories per scholar
/// - `scholar_subcategories` - Subcategories per (scholar, category name)
/// - `notes` - Notes with their container path
/// - `note_tags` - Tag names per note
/// - `note_attachments` - Attachment metadata per note
/// - `ui_prefs` - Single-row preference record
/// - `schema_version` - Schema version tracking
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    // ===========================================
    // Corpus Hierarchy
    // ===========================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS scholars (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            era TEXT,
            madhhab TEXT
        );",
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS scholar_categories (
            id TEXT PRIMARY KEY,
            scholar_id TEXT NOT NULL REFERENCES scholars(id) ON DELETE CASCADE,
            name TEXT NOT NULL
        );",
    )?;

    // Subcategories reference their category by (scholar_id, name); category
    // names are not unique, so that link is checked on write instead
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS scholar_subcategories (
            id TEXT PRIMARY KEY,
            scholar_id TEXT NOT NULL REFERENCES scholars(id) ON DELETE CASCADE,
            category_name TEXT NOT NULL,
            name TEXT NOT NULL
        );",
    )?;

    // ===========================================
    // Notes
    // ===========================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS notes (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            body TEXT NOT NULL DEFAULT '',
            citation TEXT NOT NULL DEFAULT '',
            is_pinned INTEGER NOT NULL DEFAULT 0,
            container TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );",
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS note_tags (
            note_id TEXT NOT NULL REFERENCES notes(id) ON DELETE CASCADE,
            tag_name TEXT NOT NULL,
            PRIMARY KEY (note_id, tag_name)
        );",
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS note_attachments (
            id TEXT PRIMARY KEY,
            note_id TEXT NOT NULL REFERENCES notes(id) ON DELETE CASCADE,
            display_name TEXT NOT NULL,
            mime_type TEXT NOT NULL,
            size_bytes INTEGER NOT NULL,
            storage_path TEXT NOT NULL
        );",
    )?;

    // ===========================================
    // Preferences
    // ===========================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS ui_prefs (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            display_mode TEXT NOT NULL
        );",
    )?;

    // ===========================================
    // Indexes
    // ===========================================
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_categories_scholar ON scholar_categories(scholar_id);
         CREATE INDEX IF NOT EXISTS idx_subcategories_parent
             ON scholar_subcategories(scholar_id, category_name);
         CREATE INDEX IF NOT EXISTS idx_notes_updated ON notes(updated_at);
         CREATE INDEX IF NOT EXISTS idx_notes_container ON notes(container);
         CREATE INDEX IF NOT EXISTS idx_attachments_note ON note_attachments(note_id);
         CREATE UNIQUE INDEX IF NOT EXISTS idx_attachments_storage_path
             ON note_attachments(storage_path);",
    )?;

    // ===========================================
    // Schema Version Table
    // ===========================================
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
        [SCHEMA_VERSION],
    )?;

    Ok(())
}

/// Returns the current schema version.
pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get(0)
    })
}
