//! The backup document and artifact formats.

use crate::domain::{
    AppNote, Dataset, NoteAttachment, NoteTag, Scholar, ScholarCategory, ScholarSubcategory,
    UiPrefs,
};
use crate::backup::BackupError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Version written into every new backup.
pub const FORMAT_VERSION: u32 = 1;

/// Value of the `app` field.
pub const APP_NAME: &str = "corpus-vault";

/// Name of the document entry inside a ZIP backup.
pub const MANIFEST_ENTRY: &str = "backup.json";

/// Directory prefix of attachment entries inside a ZIP backup.
pub const ATTACHMENTS_PREFIX: &str = "attachments/";

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

// ===========================================
// BackupFormat
// ===========================================

/// Backup artifact format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackupFormat {
    /// `backup.json` plus attachment files in one archive.
    #[default]
    Zip,
    /// The document alone; attachment files are not included.
    Json,
}

impl BackupFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            BackupFormat::Zip => "application/zip",
            BackupFormat::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            BackupFormat::Zip => "zip",
            BackupFormat::Json => "json",
        }
    }

    /// Detects the format from the leading bytes of an artifact.
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(ZIP_MAGIC) {
            BackupFormat::Zip
        } else {
            BackupFormat::Json
        }
    }
}

impl fmt::Display for BackupFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for BackupFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zip" => Ok(BackupFormat::Zip),
            "json" => Ok(BackupFormat::Json),
            other => Err(format!("unknown backup format '{}': expected zip or json", other)),
        }
    }
}

// ===========================================
// BackupDocument
// ===========================================

/// Attachment metadata as written into a backup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentEntry {
    #[serde(flatten)]
    pub attachment: NoteAttachment,
    /// Hex SHA256 of the file bytes, when the file was archived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    /// Entry name of the file inside a ZIP backup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_path: Option<String>,
}

impl AttachmentEntry {
    /// Metadata only, no archived file.
    pub fn metadata(attachment: NoteAttachment) -> Self {
        Self {
            attachment,
            sha256: None,
            archive_path: None,
        }
    }

    /// The conventional archive entry name for an attachment.
    pub fn archive_path_for(attachment: &NoteAttachment) -> String {
        format!("{}{}", ATTACHMENTS_PREFIX, attachment.id)
    }
}

fn default_format_version() -> u32 {
    FORMAT_VERSION
}

/// The whole dataset in its serialized backup shape.
///
/// Documents without `formatVersion` are read as version 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub app: String,
    #[serde(default)]
    pub scholars: Vec<Scholar>,
    #[serde(default)]
    pub categories: Vec<ScholarCategory>,
    #[serde(default)]
    pub subcategories: Vec<ScholarSubcategory>,
    #[serde(default)]
    pub notes: Vec<AppNote>,
    #[serde(default)]
    pub note_tags: Vec<NoteTag>,
    #[serde(default)]
    pub attachments: Vec<AttachmentEntry>,
    #[serde(default)]
    pub prefs: UiPrefs,
}

impl BackupDocument {
    /// Wraps a dataset, stamping the current version and export time.
    pub fn new(dataset: Dataset, attachments: Vec<AttachmentEntry>, now: DateTime<Utc>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            exported_at: Some(now),
            app: APP_NAME.to_string(),
            scholars: dataset.scholars,
            categories: dataset.categories,
            subcategories: dataset.subcategories,
            notes: dataset.notes,
            note_tags: dataset.note_tags,
            attachments,
            prefs: dataset.prefs,
        }
    }

    /// Parses a JSON document and checks its version.
    pub fn from_json(bytes: &[u8]) -> Result<Self, BackupError> {
        let document: BackupDocument = serde_json::from_slice(bytes)?;
        document.check_version()?;
        Ok(document)
    }

    /// Rejects documents written by a newer format.
    pub fn check_version(&self) -> Result<(), BackupError> {
        if self.format_version > FORMAT_VERSION {
            return Err(BackupError::UnsupportedVersion {
                found: self.format_version,
                supported: FORMAT_VERSION,
            });
        }
        Ok(())
    }

    /// The rows to restore, without archive bookkeeping.
    pub fn to_dataset(&self) -> Dataset {
        Dataset {
            scholars: self.scholars.clone(),
            categories: self.categories.clone(),
            subcategories: self.subcategories.clone(),
            notes: self.notes.clone(),
            note_tags: self.note_tags.clone(),
            attachments: self
                .attachments
                .iter()
                .map(|entry| entry.attachment.clone())
                .collect(),
            prefs: self.prefs,
        }
    }
}
