//! JSON and ZIP encoding of backup artifacts.

use crate::backup::BackupError;
use crate::backup::format::{BackupDocument, BackupFormat, MANIFEST_ENTRY};
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek, Write};
use tracing::debug;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Serializes a document as pretty-printed JSON.
pub fn encode_json<W: Write>(document: &BackupDocument, writer: W) -> Result<(), BackupError> {
    serde_json::to_writer_pretty(writer, document)?;
    Ok(())
}

/// Streams attachment files into a ZIP, then the document last.
///
/// Writing the document last lets hashes computed while archiving the files
/// land in `backup.json`.
pub struct ZipBackupWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    files: usize,
}

impl<W: Write + Seek> ZipBackupWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            files: 0,
        }
    }

    fn options() -> SimpleFileOptions {
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
    }

    /// Adds one attachment file.
    pub fn add_file(&mut self, name: &str, bytes: &[u8]) -> Result<(), BackupError> {
        self.zip.start_file(name, Self::options())?;
        self.zip
            .write_all(bytes)
            .map_err(|e| BackupError::io(format!("writing archive entry '{}'", name), e))?;
        self.files += 1;
        Ok(())
    }

    /// Writes `backup.json` and finalizes the archive.
    pub fn finish(mut self, document: &BackupDocument) -> Result<W, BackupError> {
        self.zip.start_file(MANIFEST_ENTRY, Self::options())?;
        serde_json::to_writer_pretty(&mut self.zip, document)?;
        debug!(files = self.files, "finished backup archive");
        Ok(self.zip.finish()?)
    }
}

/// A decoded backup artifact.
#[derive(Debug)]
pub struct DecodedBackup {
    pub format: BackupFormat,
    pub document: BackupDocument,
    /// Archived file bytes keyed by entry name. Empty for JSON backups.
    pub files: HashMap<String, Vec<u8>>,
}

/// Decodes a backup, detecting JSON or ZIP from the leading bytes.
///
/// Every attachment that names an `archivePath` must have that entry.
pub fn decode(bytes: &[u8]) -> Result<DecodedBackup, BackupError> {
    let format = BackupFormat::detect(bytes);
    match format {
        BackupFormat::Json => Ok(DecodedBackup {
            format,
            document: BackupDocument::from_json(bytes)?,
            files: HashMap::new(),
        }),
        BackupFormat::Zip => decode_zip(bytes),
    }
}

fn decode_zip(bytes: &[u8]) -> Result<DecodedBackup, BackupError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let manifest = read_entry(&mut archive, MANIFEST_ENTRY)?;
    let document = BackupDocument::from_json(&manifest)?;

    let mut files = HashMap::new();
    for entry in &document.attachments {
        if let Some(path) = &entry.archive_path
            && !files.contains_key(path)
        {
            let data = read_entry(&mut archive, path)?;
            files.insert(path.clone(), data);
        }
    }

    debug!(entries = archive.len(), files = files.len(), "decoded backup archive");
    Ok(DecodedBackup {
        format: BackupFormat::Zip,
        document,
        files,
    })
}

fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Vec<u8>, BackupError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Err(BackupError::MissingEntry(name.to_string())),
        Err(e) => return Err(e.into()),
    };
    let mut data = Vec::new();
    file.read_to_end(&mut data)
        .map_err(|e| BackupError::io(format!("reading archive entry '{}'", name), e))?;
    Ok(data)
}
