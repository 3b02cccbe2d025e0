//! Export and destructive import of the whole vault.

use crate::backup::BackupError;
use crate::backup::archive::{self, DecodedBackup, ZipBackupWriter};
use crate::backup::format::{AttachmentEntry, BackupDocument, BackupFormat};
use crate::domain::{
    DatasetCounts, find_broken_references, find_duplicate_ids, find_orphaned_containers,
};
use crate::infra::{BlobError, BlobStore, ContentHash};
use crate::store::SqliteStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::io::{Read, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Outcome of an export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    #[serde(serialize_with = "serialize_format")]
    pub format: BackupFormat,
    pub counts: DatasetCounts,
    /// Attachment files written into the archive.
    pub files: usize,
    pub file_bytes: u64,
}

/// Outcome of an import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    #[serde(serialize_with = "serialize_format")]
    pub format: BackupFormat,
    pub counts: DatasetCounts,
    /// Attachment files placed in the blob store.
    pub files_restored: usize,
    /// Non-fatal findings, such as notes filed under unknown containers.
    pub warnings: Vec<String>,
}

fn serialize_format<S: serde::Serializer>(format: &BackupFormat, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(format.extension())
}

/// Backup file name such as `corpus-vault-backup-1718035200000.zip`.
pub fn default_file_name(format: BackupFormat, now: DateTime<Utc>) -> String {
    format!(
        "corpus-vault-backup-{}.{}",
        now.timestamp_millis(),
        format.extension()
    )
}

/// Exports the store and blob files, and restores them destructively.
pub struct BackupManager<'a> {
    store: &'a mut SqliteStore,
    blobs: &'a BlobStore,
}

impl<'a> BackupManager<'a> {
    pub fn new(store: &'a mut SqliteStore, blobs: &'a BlobStore) -> Self {
        Self { store, blobs }
    }

    // ===========================================
    // Export
    // ===========================================

    /// Writes a backup of everything to `writer`.
    ///
    /// ZIP exports fail if any attachment file is missing from the blob store.
    pub fn export_to<W: Write + Seek>(
        &self,
        writer: W,
        format: BackupFormat,
    ) -> Result<ExportSummary, BackupError> {
        let dataset = self.store.snapshot()?;
        let counts = dataset.counts();
        let mut files = 0;
        let mut file_bytes = 0u64;

        match format {
            BackupFormat::Json => {
                let entries = dataset
                    .attachments
                    .iter()
                    .cloned()
                    .map(AttachmentEntry::metadata)
                    .collect();
                let document = BackupDocument::new(dataset, entries, Utc::now());
                archive::encode_json(&document, writer)?;
            }
            BackupFormat::Zip => {
                let mut zip = ZipBackupWriter::new(writer);
                let mut entries = Vec::with_capacity(dataset.attachments.len());

                for attachment in &dataset.attachments {
                    let bytes = self.blobs.read(&attachment.storage_path).map_err(|e| match e {
                        BlobError::NotFound { .. } => BackupError::MissingBlob {
                            attachment_id: attachment.id.clone(),
                            storage_path: attachment.storage_path.clone(),
                        },
                        other => BackupError::Blob(other),
                    })?;

                    let path = AttachmentEntry::archive_path_for(attachment);
                    zip.add_file(&path, &bytes)?;
                    files += 1;
                    file_bytes += bytes.len() as u64;

                    entries.push(AttachmentEntry {
                        attachment: attachment.clone(),
                        sha256: Some(ContentHash::compute(&bytes).to_string()),
                        archive_path: Some(path),
                    });
                }

                let document = BackupDocument::new(dataset, entries, Utc::now());
                zip.finish(&document)?;
            }
        }

        info!(%format, %counts, files, "exported backup");
        Ok(ExportSummary {
            format,
            counts,
            files,
            file_bytes,
        })
    }

    /// Exports to a file, replacing it atomically.
    pub fn export_to_path(
        &self,
        path: &Path,
        format: BackupFormat,
    ) -> Result<ExportSummary, BackupError> {
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)
            .map_err(|e| BackupError::io(format!("creating {}", parent.display()), e))?;

        let mut temp = NamedTempFile::new_in(parent)
            .map_err(|e| BackupError::io(format!("creating temp file in {}", parent.display()), e))?;
        let summary = self.export_to(temp.as_file_mut(), format)?;
        temp.as_file_mut()
            .flush()
            .map_err(|e| BackupError::io(format!("writing {}", path.display()), e))?;
        temp.persist(path)
            .map_err(|e| BackupError::io(format!("saving {}", path.display()), e.error))?;
        Ok(summary)
    }

    // ===========================================
    // Import
    // ===========================================

    /// Replaces ALL data with the contents of a backup.
    ///
    /// The backup is fully decoded and validated, and its files staged, before
    /// anything is changed. Database rows are replaced in one transaction;
    /// the blob directory is swapped in after that commits.
    pub fn import_from<R: Read>(&mut self, mut reader: R) -> Result<ImportSummary, BackupError> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| BackupError::io("reading backup", e))?;

        let decoded = archive::decode(&bytes)?;
        self.restore(decoded)
    }

    /// Imports from a file.
    pub fn import_from_path(&mut self, path: &Path) -> Result<ImportSummary, BackupError> {
        let file = fs::File::open(path)
            .map_err(|e| BackupError::io(format!("opening {}", path.display()), e))?;
        self.import_from(file)
    }

    fn restore(&mut self, decoded: DecodedBackup) -> Result<ImportSummary, BackupError> {
        let DecodedBackup {
            format,
            document,
            files,
        } = decoded;
        let dataset = document.to_dataset();

        let mut errors: Vec<String> = find_duplicate_ids(&dataset)
            .into_iter()
            .chain(find_broken_references(&dataset))
            .map(|issue| issue.to_string())
            .collect();
        for attachment in &dataset.attachments {
            if let Err(e) = self.blobs.path_for(&attachment.storage_path) {
                errors.push(format!("attachment {}: {}", attachment.id, e));
            }
        }
        if !errors.is_empty() {
            return Err(BackupError::Invalid(errors));
        }

        let mut warnings: Vec<String> = find_orphaned_containers(&dataset)
            .into_iter()
            .map(|issue| issue.to_string())
            .collect();

        // Verify every archived file before touching anything
        let mut payloads: Vec<(&str, &[u8])> = Vec::new();
        let mut carried: Vec<&str> = Vec::new();
        for entry in &document.attachments {
            let attachment = &entry.attachment;
            match &entry.archive_path {
                Some(path) => {
                    let data = files
                        .get(path)
                        .ok_or_else(|| BackupError::MissingEntry(path.clone()))?;
                    if let Some(expected) = &entry.sha256 {
                        let expected = ContentHash::from_hex(expected).map_err(|source| {
                            BackupError::InvalidHash {
                                attachment_id: attachment.id.clone(),
                                source,
                            }
                        })?;
                        if !expected.matches(data) {
                            return Err(BackupError::HashMismatch {
                                attachment_id: attachment.id.clone(),
                            });
                        }
                    }
                    payloads.push((attachment.storage_path.as_str(), data.as_slice()));
                }
                // Metadata-only entries keep a file already on disk
                None if self.blobs.exists(&attachment.storage_path) => {
                    carried.push(attachment.storage_path.as_str());
                }
                None => warnings.push(format!(
                    "attachment {} ({}): file not included in backup",
                    attachment.id, attachment.display_name
                )),
            }
        }

        let stage = self.blobs.stage()?;
        for (storage_path, data) in &payloads {
            stage.store().put(storage_path, data)?;
        }
        for storage_path in &carried {
            let data = self.blobs.read(storage_path)?;
            stage.store().put(storage_path, &data)?;
        }

        self.store.replace_all(&dataset)?;
        if let Err(e) = stage.commit() {
            warn!(error = %e, "database restored but attachment files could not be swapped in");
            return Err(e.into());
        }

        for warning in &warnings {
            warn!("{}", warning);
        }
        let counts = dataset.counts();
        info!(%format, %counts, files = payloads.len() + carried.len(), "imported backup");
        Ok(ImportSummary {
            format,
            counts,
            files_restored: payloads.len() + carried.len(),
            warnings,
        })
    }
}
