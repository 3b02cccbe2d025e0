//! On-disk attachment storage with atomic writes and staged replacement.

use crate::domain::{NoteAttachment, NoteId};
use crate::infra::content_hash::ContentHash;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};
use ulid::Ulid;
use walkdir::WalkDir;

/// Fallback MIME type when the extension is unknown.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Errors during blob store operations.
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("attachment file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("invalid attachment storage name '{name}'")]
    InvalidName { name: String },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("atomic write failed for {path}: {source}")]
    AtomicWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BlobError {
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => BlobError::NotFound { path: path.into() },
            _ => BlobError::Io {
                path: path.into(),
                source: error,
            },
        }
    }
}

/// Directory of attachment files, one file per storage name.
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Creates a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a storage name to its file path.
    ///
    /// # Errors
    ///
    /// Returns `BlobError::InvalidName` for names that are empty, hidden, or
    /// contain path separators, so archive entries cannot escape the store.
    pub fn path_for(&self, storage_path: &str) -> Result<PathBuf, BlobError> {
        validate_name(storage_path)?;
        Ok(self.root.join(storage_path))
    }

    /// Writes `bytes` under `storage_path` atomically.
    pub fn put(&self, storage_path: &str, bytes: &[u8]) -> Result<(), BlobError> {
        let path = self.path_for(storage_path)?;
        fs::create_dir_all(&self.root).map_err(|e| BlobError::from_io(&self.root, e))?;

        let mut temp = NamedTempFile::new_in(&self.root).map_err(|e| BlobError::Io {
            path: path.clone(),
            source: e,
        })?;
        temp.write_all(bytes).map_err(|e| BlobError::Io {
            path: path.clone(),
            source: e,
        })?;
        temp.persist(&path).map_err(|e| BlobError::AtomicWrite {
            path: path.clone(),
            source: e.error,
        })?;

        debug!(storage_path, bytes = bytes.len(), "stored attachment blob");
        Ok(())
    }

    /// Copies an external file into the store as a new attachment of `note_id`.
    ///
    /// The MIME type is guessed from the file extension.
    pub fn import_file(
        &self,
        note_id: &NoteId,
        source: &Path,
    ) -> Result<(NoteAttachment, ContentHash), BlobError> {
        let bytes = fs::read(source).map_err(|e| BlobError::from_io(source, e))?;
        let display_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        let mime = mime_guess::from_path(source)
            .first_raw()
            .unwrap_or(OCTET_STREAM);

        let attachment =
            NoteAttachment::new(note_id.clone(), display_name, mime, bytes.len() as u64);
        self.put(&attachment.storage_path, &bytes)?;
        Ok((attachment, ContentHash::compute(&bytes)))
    }

    /// Reads a stored file.
    pub fn read(&self, storage_path: &str) -> Result<Vec<u8>, BlobError> {
        let path = self.path_for(storage_path)?;
        fs::read(&path).map_err(|e| BlobError::from_io(&path, e))
    }

    pub fn exists(&self, storage_path: &str) -> bool {
        self.path_for(storage_path).is_ok_and(|p| p.is_file())
    }

    /// Deletes a stored file. Returns `false` if it was already gone.
    pub fn remove(&self, storage_path: &str) -> Result<bool, BlobError> {
        let path = self.path_for(storage_path)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(BlobError::from_io(&path, e)),
        }
    }

    /// Returns the storage names of every stored file.
    ///
    /// Hidden files (in-flight temp files) are skipped. A missing root yields
    /// an empty set.
    pub fn stored_ids(&self) -> Result<HashSet<String>, BlobError> {
        if !self.root.exists() {
            return Ok(HashSet::new());
        }

        let mut ids = HashSet::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| BlobError::Io {
                path: self.root.clone(),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !name.starts_with('.') {
                ids.insert(name.into_owned());
            }
        }
        Ok(ids)
    }

    /// Starts a staged replacement of the whole store.
    ///
    /// Files written to the returned stage are invisible until
    /// [`StagedBlobs::commit`] swaps the stage in place of the current root.
    pub fn stage(&self) -> Result<StagedBlobs, BlobError> {
        let parent = self
            .root
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let dir = parent.join(format!(".attachments-staging-{}", Ulid::new()));
        fs::create_dir_all(&dir).map_err(|e| BlobError::from_io(&dir, e))?;
        Ok(StagedBlobs {
            store: BlobStore::new(dir),
            target: self.root.clone(),
            committed: false,
        })
    }
}

fn validate_name(name: &str) -> Result<(), BlobError> {
    let bad = name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if bad {
        return Err(BlobError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// A staging directory that replaces a blob store on commit.
///
/// Dropping an uncommitted stage deletes it.
#[derive(Debug)]
pub struct StagedBlobs {
    store: BlobStore,
    target: PathBuf,
    committed: bool,
}

impl StagedBlobs {
    /// The staging store to write into.
    pub fn store(&self) -> &BlobStore {
        &self.store
    }

    /// Replaces the target directory with the staged files.
    ///
    /// The previous directory is moved aside first and removed once the
    /// staged directory is in place; if the swap fails it is moved back.
    pub fn commit(mut self) -> Result<(), BlobError> {
        let staged = self.store.root.clone();
        let retired = self
            .target
            .with_file_name(format!(".attachments-retired-{}", Ulid::new()));

        let had_previous = self.target.exists();
        if had_previous {
            fs::rename(&self.target, &retired).map_err(|e| BlobError::from_io(&self.target, e))?;
        }

        if let Err(e) = fs::rename(&staged, &self.target) {
            if had_previous && let Err(restore) = fs::rename(&retired, &self.target) {
                warn!(error = %restore, "failed to restore previous attachments directory");
            }
            return Err(BlobError::from_io(&self.target, e));
        }
        self.committed = true;

        if had_previous && let Err(e) = fs::remove_dir_all(&retired) {
            warn!(path = %retired.display(), error = %e, "failed to remove retired attachments");
        }
        Ok(())
    }
}

impl Drop for StagedBlobs {
    fn drop(&mut self) {
        if !self.committed {
            // Best effort; a leftover hidden directory is harmless
            let _ = fs::remove_dir_all(&self.store.root);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store() -> (TempDir, BlobStore) {
        let dir = TempDir::new().unwrap();
        let store = BlobStore::new(dir.path().join("attachments"));
        (dir, store)
    }

    #[test]
    fn put_then_read() {
        let (_dir, store) = store();
        store.put("abc", b"bytes").unwrap();
        assert_eq!(store.read("abc").unwrap(), b"bytes");
        assert!(store.exists("abc"));
    }

    #[test]
    fn put_overwrites() {
        let (_dir, store) = store();
        store.put("abc", b"one").unwrap();
        store.put("abc", b"two").unwrap();
        assert_eq!(store.read("abc").unwrap(), b"two");
    }

    #[test]
    fn read_missing_is_not_found() {
        let (_dir, store) = store();
        assert!(matches!(store.read("nope"), Err(BlobError::NotFound { .. })));
    }

    #[test]
    fn rejects_traversal_names() {
        let (_dir, store) = store();
        for name in ["", "../x", "a/b", ".hidden", "a\\b"] {
            assert!(
                matches!(store.put(name, b"x"), Err(BlobError::InvalidName { .. })),
                "name {:?} should be rejected",
                name
            );
        }
    }

    #[test]
    fn remove_reports_presence() {
        let (_dir, store) = store();
        store.put("abc", b"x").unwrap();
        assert!(store.remove("abc").unwrap());
        assert!(!store.remove("abc").unwrap());
    }

    #[test]
    fn stored_ids_lists_files() {
        let (_dir, store) = store();
        assert!(store.stored_ids().unwrap().is_empty());
        store.put("a", b"1").unwrap();
        store.put("b", b"2").unwrap();
        let ids = store.stored_ids().unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("a") && ids.contains("b"));
    }

    #[test]
    fn import_file_guesses_mime_and_size() {
        let (dir, store) = store();
        let src = dir.path().join("Fatawa.pdf");
        fs::write(&src, b"%PDF-1.4").unwrap();

        let note_id: NoteId = "n1".parse().unwrap();
        let (attachment, hash) = store.import_file(&note_id, &src).unwrap();

        assert_eq!(attachment.display_name, "Fatawa.pdf");
        assert_eq!(attachment.mime_type, "application/pdf");
        assert_eq!(attachment.size_bytes, 8);
        assert!(hash.matches(b"%PDF-1.4"));
        assert_eq!(store.read(&attachment.storage_path).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn import_file_unknown_extension_is_octet_stream() {
        let (dir, store) = store();
        let src = dir.path().join("blob.zzzunknown");
        fs::write(&src, b"x").unwrap();
        let (attachment, _) = store.import_file(&"n".parse().unwrap(), &src).unwrap();
        assert_eq!(attachment.mime_type, OCTET_STREAM);
    }

    #[test]
    fn staged_commit_replaces_contents() {
        let (_dir, store) = store();
        store.put("old", b"old").unwrap();

        let stage = store.stage().unwrap();
        stage.store().put("new", b"new").unwrap();
        assert!(store.exists("old"), "stage must not touch the live store");
        stage.commit().unwrap();

        assert!(!store.exists("old"));
        assert_eq!(store.read("new").unwrap(), b"new");
    }

    #[test]
    fn staged_commit_without_existing_root() {
        let (_dir, store) = store();
        let stage = store.stage().unwrap();
        stage.store().put("a", b"1").unwrap();
        stage.commit().unwrap();
        assert!(store.exists("a"));
    }

    #[test]
    fn dropped_stage_is_removed() {
        let (_dir, store) = store();
        let staged_root = {
            let stage = store.stage().unwrap();
            stage.store().put("a", b"1").unwrap();
            stage.store().root().to_path_buf()
        };
        assert!(!staged_root.exists());
        assert!(!store.exists("a"));
    }
}
