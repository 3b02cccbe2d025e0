//! Backup errors and user-facing status lines.

use crate::infra::{BlobError, ContentHashError};
use crate::store::StoreError;
use std::fmt;
use std::io;
use thiserror::Error;

/// Errors during backup export or import.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed backup document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt backup archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("backup format version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("backup archive is missing entry '{0}'")]
    MissingEntry(String),

    #[error("attachment {attachment_id} has no stored file '{storage_path}'")]
    MissingBlob {
        attachment_id: String,
        storage_path: String,
    },

    #[error("attachment {attachment_id} failed its integrity check")]
    HashMismatch { attachment_id: String },

    #[error("attachment {attachment_id} has an invalid checksum: {source}")]
    InvalidHash {
        attachment_id: String,
        #[source]
        source: ContentHashError,
    },

    #[error("backup failed validation: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Blob(#[from] BlobError),
}

impl BackupError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        BackupError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Which backup operation a status line describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupOperation {
    Export,
    Import,
}

impl fmt::Display for BackupOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupOperation::Export => write!(f, "export"),
            BackupOperation::Import => write!(f, "import"),
        }
    }
}

/// Fallback shown when an import error carries no message.
pub const INVALID_BACKUP_FILE: &str = "Invalid backup file.";

/// One-line outcome of a backup operation, for display to the user.
///
/// # Examples
///
/// ```
/// use corpus_vault::backup::{BackupError, BackupOperation, status_message};
///
/// let ok: Result<(), BackupError> = Ok(());
/// assert_eq!(
///     status_message(BackupOperation::Export, &ok),
///     "Backup exported successfully."
/// );
/// ```
pub fn status_message<T>(operation: BackupOperation, result: &Result<T, BackupError>) -> String {
    match (operation, result) {
        (BackupOperation::Export, Ok(_)) => "Backup exported successfully.".to_string(),
        (BackupOperation::Import, Ok(_)) => "Backup imported successfully.".to_string(),
        (BackupOperation::Export, Err(e)) => format!("Export failed: {}", e),
        (BackupOperation::Import, Err(e)) => import_failed(&e.to_string()),
    }
}

fn import_failed(message: &str) -> String {
    if message.trim().is_empty() {
        format!("Import failed: {}", INVALID_BACKUP_FILE)
    } else {
        format!("Import failed: {}", message)
    }
}
