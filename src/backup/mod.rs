//! Backup export and destructive restore

mod archive;
mod error;
mod format;
mod manager;

#[cfg(test)]
mod tests;

pub use archive::{DecodedBackup, ZipBackupWriter, decode, encode_json};
pub use error::{BackupError, BackupOperation, INVALID_BACKUP_FILE, status_message};
pub use format::{
    APP_NAME, ATTACHMENTS_PREFIX, AttachmentEntry, BackupDocument, BackupFormat, FORMAT_VERSION,
    MANIFEST_ENTRY,
};
pub use manager::{BackupManager, ExportSummary, ImportSummary, default_file_name};
