//! Display preference command handler.

use anyhow::{Context, Result};

use super::Vault;
use crate::cli::DisplayArgs;
use crate::domain::NoteDisplayMode;
use crate::store::PrefsRepository;

pub fn handle_display(args: &DisplayArgs, vault: &mut Vault) -> Result<()> {
    match args.mode {
        Some(mode) => {
            vault
                .store
                .set_display_mode(mode)
                .with_context(|| "failed to save display mode")?;
            println!("Display mode set to {}", mode.label());
        }
        None => {
            let current = vault
                .store
                .display_mode()
                .with_context(|| "failed to read display mode")?;
            for mode in NoteDisplayMode::ALL {
                let marker = if mode == current { "*" } else { " " };
                println!("{} {}", marker, mode.as_str());
            }
        }
    }
    Ok(())
}
