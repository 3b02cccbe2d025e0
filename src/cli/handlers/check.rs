//! Check command handler.

use anyhow::{Context, Result, bail};

use super::Vault;
use crate::domain::{Severity, ValidationSummary, find_missing_blobs, validate_dataset};

/// Validates the stored dataset against itself and the blob store.
pub(crate) fn check_vault(vault: &Vault) -> Result<ValidationSummary> {
    let snapshot = vault
        .store
        .snapshot()
        .with_context(|| "failed to read database")?;
    let stored = vault
        .blobs
        .stored_ids()
        .with_context(|| "failed to list attachment files")?;

    let mut summary = validate_dataset(&snapshot);
    summary.extend(find_missing_blobs(&snapshot, &stored));
    Ok(summary)
}

pub fn handle_check(vault: &mut Vault) -> Result<()> {
    let summary = check_vault(vault)?;

    if summary.is_ok() {
        println!("All notes OK.");
        return Ok(());
    }

    for issue in summary.issues_by_severity() {
        let prefix = match issue.severity() {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        println!("{}: {}", prefix, issue);
    }
    println!(
        "\nFound {} issue(s): {} error(s), {} warning(s)",
        summary.total(),
        summary.error_count(),
        summary.warning_count()
    );

    // Only errors fail the command
    if summary.has_errors() {
        bail!("check failed");
    }
    Ok(())
}
