//! Isolated test environment with temp directory.

// Allow dead code since each test binary uses a different subset
#![allow(dead_code)]

use super::VaultCommand;
use corpus_vault::cli::handlers::{attachments_dir, db_path};
use corpus_vault::domain::AppNote;
use corpus_vault::infra::BlobStore;
use corpus_vault::store::{NotesRepository, SqliteStore};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test environment with a temporary data directory.
///
/// Creates a temp directory that is automatically cleaned up on drop.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    _temp_dir: TempDir,
    /// Path to the data directory
    data_dir: PathBuf,
}

impl TestEnv {
    /// Creates a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let data_dir = temp_dir.path().join("vault");
        Self {
            _temp_dir: temp_dir,
            data_dir,
        }
    }

    /// Returns the path to the data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns a scratch directory outside the data directory.
    pub fn scratch(&self) -> &Path {
        self._temp_dir.path()
    }

    /// Returns the path of the SQLite database.
    pub fn db_path(&self) -> PathBuf {
        db_path(&self.data_dir)
    }

    /// Opens the database directly.
    pub fn store(&self) -> SqliteStore {
        SqliteStore::open(&self.db_path()).expect("Failed to open store")
    }

    /// Returns the attachment blob store.
    pub fn blobs(&self) -> BlobStore {
        BlobStore::new(attachments_dir(&self.data_dir))
    }

    /// Saves a note directly through the store.
    pub fn add_note(&self, note: &AppNote) {
        self.store().upsert(note).expect("Failed to save note");
    }

    /// Creates a VaultCommand configured for this test environment.
    pub fn cmd(&self) -> VaultCommand {
        VaultCommand::new().dir(&self.data_dir)
    }

    /// Writes a file to the scratch directory and returns its path.
    pub fn write_file(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.scratch().join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.scratch().to_path_buf()
        };
        assert!(!path.exists(), "temp directory should be cleaned up on drop");
    }

    #[test]
    fn test_env_db_path() {
        let env = TestEnv::new();
        assert!(env.db_path().ends_with("vault/vault.db"));
        assert!(env.db_path().starts_with(env.data_dir()));
    }

    #[test]
    fn test_env_add_note_is_visible() {
        let env = TestEnv::new();
        env.add_note(&AppNote::builder("Direct").build());
        let notes = env.store().list_all().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title(), "Direct");
    }

    #[test]
    fn test_env_provides_command() {
        let env = TestEnv::new();
        let cmd = env.cmd();
        let args = cmd.get_args();
        assert_eq!(args[0], "--dir");
        assert_eq!(args[1], env.data_dir().to_string_lossy());
    }
}
