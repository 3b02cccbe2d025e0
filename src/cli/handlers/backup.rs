//! Export and import command handlers.

use anyhow::{Result, anyhow, bail};
use chrono::Utc;
use std::path::{Path, PathBuf};

use super::Vault;
use crate::backup::{BackupFormat, BackupManager, BackupOperation, default_file_name, status_message};
use crate::cli::output::{Output, OutputFormat};
use crate::cli::{ExportArgs, ImportArgs};

/// Resolves the export target: directories get a timestamped file name.
pub(crate) fn export_target(path: &Path, format: BackupFormat) -> PathBuf {
    if path.is_dir() {
        path.join(default_file_name(format, Utc::now()))
    } else {
        path.to_path_buf()
    }
}

pub fn handle_export(args: &ExportArgs, vault: &mut Vault) -> Result<()> {
    let format = if args.json {
        BackupFormat::Json
    } else {
        BackupFormat::Zip
    };
    let target = export_target(&args.path, format);

    let manager = BackupManager::new(&mut vault.store, &vault.blobs);
    let result = manager.export_to_path(&target, format);
    let message = status_message(BackupOperation::Export, &result);
    let summary = result.map_err(|_| anyhow!(message.clone()))?;

    match args.output.format {
        OutputFormat::Human => {
            println!("{}", message);
            println!("  {}", target.display());
            println!("  {}", summary.counts);
            if format == BackupFormat::Zip {
                println!("  {} attachment file(s)", summary.files);
            }
        }
        OutputFormat::Json => Output::new(&summary).print()?,
    }
    Ok(())
}

pub fn handle_import(args: &ImportArgs, vault: &mut Vault) -> Result<()> {
    if !args.yes {
        bail!(
            "importing replaces ALL notes, scholars, and attachments; re-run with --yes to confirm"
        );
    }

    let mut manager = BackupManager::new(&mut vault.store, &vault.blobs);
    let result = manager.import_from_path(&args.path);
    let message = status_message(BackupOperation::Import, &result);
    let summary = result.map_err(|_| anyhow!(message.clone()))?;

    match args.output.format {
        OutputFormat::Human => {
            println!("{}", message);
            println!("  {}", summary.counts);
            println!("  {} attachment file(s) restored", summary.files_restored);
            for warning in &summary.warnings {
                eprintln!("warning: {}", warning);
            }
        }
        OutputFormat::Json => Output::new(&summary).print()?,
    }
    Ok(())
}
