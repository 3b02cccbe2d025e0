//! corpus-vault - scholar-organized notes with attachments and backups

pub mod backup;
pub mod cli;
pub mod domain;
pub mod infra;
pub mod store;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use cli::{
    Cli, Command,
    config::Config,
    handlers::{
        Vault, handle_attachments, handle_category, handle_check, handle_display, handle_export,
        handle_import, handle_note, handle_scholar, handle_search, handle_stats,
        handle_subcategory,
    },
    logging,
};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    logging::init(config.log.as_deref(), cli.verbose);

    if let Command::Completions(args) = &cli.command {
        clap_complete::generate(args.shell, &mut Cli::command(), "vault", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = config.data_dir(cli.dir.as_ref());
    tracing::debug!(data_dir = %data_dir.display(), "opening vault");
    let mut vault = Vault::open(&data_dir)?;

    match &cli.command {
        Command::Scholar { command } => handle_scholar(command, &mut vault),
        Command::Category { command } => handle_category(command, &mut vault),
        Command::Subcategory { command } => handle_subcategory(command, &mut vault),
        Command::Note { command } => handle_note(command, &mut vault),
        Command::Attachments(args) => handle_attachments(args, &mut vault),
        Command::Search(args) => handle_search(args, &mut vault),
        Command::Stats(args) => handle_stats(args, &mut vault),
        Command::Display(args) => handle_display(args, &mut vault),
        Command::Export(args) => handle_export(args, &mut vault),
        Command::Import(args) => handle_import(args, &mut vault),
        Command::Check => handle_check(&mut vault),
        Command::Completions(_) => Ok(()),
    }
}
