//! Search, attachment listing, and stats command handlers.

use anyhow::{Context, Result};
use serde::Serialize;

use super::notes::{preview, print_note_list};
use super::{Vault, format_size, truncate_str};
use crate::cli::output::{NoteListing, Output, OutputFormat};
use crate::cli::{AttachmentsArgs, SearchArgs, StatsArgs};
use crate::domain::{AppNote, NoteQuery, RECENT_LIMIT, group_tags, recent};
use crate::store::{NoteStats, NotesRepository};

/// Runs a note query against every note, most recently updated first.
pub(crate) fn search_notes<R: NotesRepository>(store: &R, query: &str) -> Result<Vec<AppNote>> {
    let notes = store.list_all().with_context(|| "failed to list notes")?;
    let tags_by_note = group_tags(&store.all_note_tag_names()?);
    let query = NoteQuery::new(query);
    Ok(query
        .filter(&notes, &tags_by_note)
        .into_iter()
        .cloned()
        .collect())
}

pub fn handle_search(args: &SearchArgs, vault: &mut Vault) -> Result<()> {
    let results = search_notes(&vault.store, &args.query)
        .with_context(|| format!("search failed for query: {}", args.query))?;

    match args.output.format {
        OutputFormat::Human => {
            if results.is_empty() {
                println!("No matching notes found.");
                return Ok(());
            }
            for note in &results {
                println!(
                    "{} {}  [{}]",
                    note.id().prefix(),
                    note.title(),
                    note.container()
                );
                let snippet = preview(note, 72);
                if !snippet.is_empty() {
                    println!("  {}", snippet);
                }
            }
            println!();
            println!("{} result(s)", results.len());
        }
        OutputFormat::Json => print_note_list(&results, OutputFormat::Json)?,
    }
    Ok(())
}

pub fn handle_attachments(args: &AttachmentsArgs, vault: &mut Vault) -> Result<()> {
    let all = vault
        .store
        .all_attachments()
        .with_context(|| "failed to list attachments")?;
    let matches = args
        .filter
        .apply(&all, args.query.as_deref().unwrap_or_default());

    match args.output.format {
        OutputFormat::Human => {
            if matches.is_empty() {
                println!("No attachments found.");
                return Ok(());
            }
            println!("{:<40}  {:<24}  {:>9}  {:<10}", "Name", "Type", "Size", "Note");
            for a in &matches {
                println!(
                    "{:<40}  {:<24}  {:>9}  {:<10}",
                    truncate_str(&a.display_name, 40),
                    truncate_str(&a.mime_type, 24),
                    format_size(a.size_bytes),
                    a.note_id.prefix()
                );
            }
            println!();
            println!("{} attachment(s) ({})", matches.len(), args.filter);
        }
        OutputFormat::Json => Output::new(&matches).print()?,
    }
    Ok(())
}

/// Counts plus recent activity.
#[derive(Debug, Serialize)]
struct StatsReport {
    #[serde(flatten)]
    stats: NoteStats,
    recent: Vec<NoteListing>,
}

pub fn handle_stats(args: &StatsArgs, vault: &mut Vault) -> Result<()> {
    let stats = vault.store.stats().with_context(|| "failed to count notes")?;
    let notes = vault.store.list_all()?;
    let latest = recent(&notes, RECENT_LIMIT);

    match args.output.format {
        OutputFormat::Human => {
            println!("Notes:       {}", stats.notes);
            println!("Pinned:      {}", stats.pinned);
            println!("Attachments: {}", stats.attachments);
            println!("Tags:        {}", stats.tags);
            if !latest.is_empty() {
                println!();
                println!("Recent:");
                for note in &latest {
                    println!(
                        "  {}  {}  {}",
                        note.updated_at().format("%Y-%m-%d"),
                        note.id().prefix(),
                        truncate_str(note.title(), 50)
                    );
                }
            }
        }
        OutputFormat::Json => Output::new(StatsReport {
            stats,
            recent: latest.into_iter().map(NoteListing::from).collect(),
        })
        .print()?,
    }
    Ok(())
}
