//! Command handlers for the CLI.

mod backup;
mod check;
mod corpus;
mod display;
mod notes;
mod resolve;
mod search;


use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::domain::{Container, Dataset, known_containers};
use crate::infra::BlobStore;
use crate::store::{CorpusRepository, SqliteStore};

// Re-export public items
pub use backup::{handle_export, handle_import};
pub use check::handle_check;
pub use corpus::{find_scholar, handle_category, handle_scholar, handle_subcategory};
pub use display::handle_display;
pub use notes::handle_note;
pub use resolve::{ResolveResult, resolve_note};
pub use search::{handle_attachments, handle_search, handle_stats};

// ===========================================
// Shared Utilities
// ===========================================

/// The database and attachment files of one data directory.
pub struct Vault {
    pub store: SqliteStore,
    pub blobs: BlobStore,
}

impl Vault {
    /// Opens (creating if needed) the vault in `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let db_path = db_path(data_dir);
        let store = SqliteStore::open(&db_path)
            .with_context(|| format!("failed to open database at {}", db_path.display()))?;
        Ok(Self {
            store,
            blobs: BlobStore::new(attachments_dir(data_dir)),
        })
    }
}

/// Returns the database path for a data directory.
pub fn db_path(data_dir: &Path) -> PathBuf {
    data_dir.join("vault.db")
}

/// Returns the attachment blob directory for a data directory.
pub fn attachments_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("attachments")
}

/// Parses a container path, warning when it names no existing scholar or
/// category.
pub(crate) fn parse_container(store: &SqliteStore, path: &str) -> Result<Container> {
    let container: Container = path
        .parse()
        .with_context(|| format!("invalid container: {}", path))?;

    let hierarchy = Dataset {
        scholars: store.list_scholars()?,
        categories: store.all_categories()?,
        subcategories: store.all_subcategories()?,
        ..Default::default()
    };
    if !known_containers(&hierarchy).contains(&container) {
        eprintln!(
            "warning: '{}' does not name an existing scholar or category",
            container
        );
    }
    Ok(container)
}

/// Truncates a string to a maximum display width, adding ellipsis if needed.
pub(crate) fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

/// Formats a byte count as B, KB, or MB.
pub(crate) fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    match bytes {
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{} B", b),
    }
}
