//! Note command handlers.

use anyhow::{Context, Result, bail};
use std::collections::HashSet;
use tracing::warn;

use super::resolve::require_note;
use super::{Vault, format_size, parse_container, truncate_str};
use crate::cli::output::{NoteDetail, NoteListing, Output, OutputFormat};
use crate::cli::{
    NoteAttachArgs, NoteCommand, NoteEditArgs, NoteLsArgs, NoteMvArgs, NoteNewArgs, NoteRefArgs,
    NoteShowArgs, NoteTagArgs,
};
use crate::domain::{AppNote, Container, Tag, group_tags};
use crate::infra::to_plain_text;
use crate::store::NotesRepository;

pub fn handle_note(command: &NoteCommand, vault: &mut Vault) -> Result<()> {
    match command {
        NoteCommand::New(args) => handle_new(args, vault),
        NoteCommand::Ls(args) => handle_ls(args, vault),
        NoteCommand::Show(args) => handle_show(args, vault),
        NoteCommand::Edit(args) => handle_edit(args, vault),
        NoteCommand::Pin(args) => handle_pin(args, vault),
        NoteCommand::Mv(args) => handle_mv(args, vault),
        NoteCommand::Rm(args) => handle_rm(args, vault),
        NoteCommand::Tag(args) => handle_tag(args, vault),
        NoteCommand::Untag(args) => handle_untag(args, vault),
        NoteCommand::Attach(args) => handle_attach(args, vault),
    }
}

/// Parses tag arguments, failing on the first invalid one.
pub(crate) fn parse_tags(tag_strs: &[String]) -> Result<Vec<Tag>> {
    tag_strs
        .iter()
        .map(|t| Tag::new(t).with_context(|| format!("invalid tag: {}", t)))
        .collect()
}

fn handle_new(args: &NoteNewArgs, vault: &mut Vault) -> Result<()> {
    let container = match &args.container {
        Some(path) => parse_container(&vault.store, path)?,
        None => Container::general(),
    };
    let tags = parse_tags(&args.tags)?;

    let note = AppNote::builder(args.title.as_deref().unwrap_or_default())
        .body(args.body.as_deref().unwrap_or_default())
        .citation(args.citation.as_deref().unwrap_or_default())
        .pinned(args.pin)
        .container(container)
        .build();

    vault
        .store
        .upsert(&note)
        .with_context(|| "failed to save note")?;
    if !tags.is_empty() {
        vault
            .store
            .set_tags(note.id(), &tags)
            .with_context(|| "failed to tag note")?;
    }

    match args.output.format {
        OutputFormat::Human => {
            println!("Created note {} \"{}\"", note.id(), note.title());
            println!("  in {}", note.container());
        }
        OutputFormat::Json => Output::new(NoteListing::from(&note)).print()?,
    }
    Ok(())
}

fn handle_ls(args: &NoteLsArgs, vault: &mut Vault) -> Result<()> {
    let mut notes = match &args.container {
        Some(path) => {
            let container: Container = path
                .parse()
                .with_context(|| format!("invalid container: {}", path))?;
            vault
                .store
                .list_by_container(&container)
                .with_context(|| format!("failed to list notes in {}", container))?
        }
        None => vault
            .store
            .list_all()
            .with_context(|| "failed to list notes")?,
    };

    if args.pinned {
        notes.retain(|n| n.is_pinned());
    }

    // Every requested tag must be present
    if !args.tags.is_empty() {
        let required: HashSet<Tag> = parse_tags(&args.tags)?.into_iter().collect();
        let tags_by_note = group_tags(&vault.store.all_note_tag_names()?);
        notes.retain(|n| {
            let have: HashSet<&Tag> = tags_by_note
                .get(n.id())
                .map(|tags| tags.iter().collect())
                .unwrap_or_default();
            required.iter().all(|t| have.contains(&t))
        });
    }

    // Pinned first; sort is stable so recency order holds within each group
    notes.sort_by_key(|n| !n.is_pinned());

    print_note_list(&notes, args.output.format)
}

/// Prints notes as a table or JSON listing.
pub(crate) fn print_note_list(notes: &[AppNote], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            if notes.is_empty() {
                println!("No notes found.");
                return Ok(());
            }
            println!(
                "{:<10}  {:1}  {:<40}  {:<30}  {:>10}",
                "ID", "", "Title", "Container", "Updated"
            );
            println!(
                "{:<10}  {:1}  {:<40}  {:<30}  {:>10}",
                "----------",
                "-",
                "----------------------------------------",
                "------------------------------",
                "----------"
            );
            for note in notes {
                println!(
                    "{:<10}  {:1}  {:<40}  {:<30}  {:>10}",
                    note.id().prefix(),
                    if note.is_pinned() { "*" } else { "" },
                    truncate_str(note.title(), 40),
                    truncate_str(note.container().as_str(), 30),
                    note.updated_at().format("%Y-%m-%d").to_string()
                );
            }
            println!();
            println!("{} note(s)", notes.len());
        }
        OutputFormat::Json => {
            let listings: Vec<NoteListing> = notes.iter().map(NoteListing::from).collect();
            Output::new(listings).print()?;
        }
    }
    Ok(())
}

fn handle_show(args: &NoteShowArgs, vault: &mut Vault) -> Result<()> {
    let note = require_note(&vault.store, &args.note)?;
    let tags = vault.store.tags_for(note.id())?;
    let attachments = vault.store.attachments_for(note.id())?;

    match args.output.format {
        OutputFormat::Human => {
            println!("# {}", note.title());
            println!();
            println!(
                "ID: {}  Updated: {}{}",
                note.id(),
                note.updated_at().format("%Y-%m-%d %H:%M"),
                if note.is_pinned() { "  Pinned" } else { "" }
            );
            println!("In: {}", note.container());
            if !note.citation().is_empty() {
                println!("Citation: {}", note.citation());
            }
            if !tags.is_empty() {
                let names: Vec<&str> = tags.iter().map(Tag::as_str).collect();
                println!("Tags: {}", names.join(", "));
            }
            for a in &attachments {
                println!(
                    "Attachment: {} ({}, {})",
                    a.display_name,
                    a.mime_type,
                    format_size(a.size_bytes)
                );
            }
            println!();
            if !note.body().is_empty() {
                println!("{}", note.body());
            }
        }
        OutputFormat::Json => Output::new(NoteDetail {
            note: &note,
            tags: &tags,
            attachments: &attachments,
        })
        .print()?,
    }
    Ok(())
}

fn handle_edit(args: &NoteEditArgs, vault: &mut Vault) -> Result<()> {
    if args.title.is_none() && args.body.is_none() && args.citation.is_none() {
        bail!("nothing to change: pass --title, --body, or --citation");
    }
    let mut note = require_note(&vault.store, &args.note)?;

    if let Some(title) = &args.title {
        note.set_title(title.as_str());
    }
    if let Some(body) = &args.body {
        note.set_body(body.as_str());
    }
    if let Some(citation) = &args.citation {
        note.set_citation(citation.as_str());
    }
    note.touch();

    vault
        .store
        .upsert(&note)
        .with_context(|| format!("failed to save note {}", note.id()))?;
    println!("Updated \"{}\"", note.title());
    Ok(())
}

fn handle_pin(args: &NoteRefArgs, vault: &mut Vault) -> Result<()> {
    let note = require_note(&vault.store, &args.note)?;
    let pinned = vault.store.toggle_pin(note.id())?;
    println!(
        "{} \"{}\"",
        if pinned { "Pinned" } else { "Unpinned" },
        note.title()
    );
    Ok(())
}

fn handle_mv(args: &NoteMvArgs, vault: &mut Vault) -> Result<()> {
    let note = require_note(&vault.store, &args.note)?;
    let container = parse_container(&vault.store, &args.container)?;
    vault
        .store
        .move_note(note.id(), &container)
        .with_context(|| format!("failed to move note {}", note.id()))?;
    println!("Moved \"{}\" to {}", note.title(), container);
    Ok(())
}

fn handle_rm(args: &NoteRefArgs, vault: &mut Vault) -> Result<()> {
    let note = require_note(&vault.store, &args.note)?;
    let attachments = vault
        .store
        .delete_by_id(note.id())
        .with_context(|| format!("failed to delete note {}", note.id()))?;

    for a in &attachments {
        if let Err(e) = vault.blobs.remove(&a.storage_path) {
            warn!(attachment = %a.id, error = %e, "failed to remove attachment file");
        }
    }
    println!(
        "Deleted \"{}\" ({} attachment(s))",
        note.title(),
        attachments.len()
    );
    Ok(())
}

fn handle_tag(args: &NoteTagArgs, vault: &mut Vault) -> Result<()> {
    let note = require_note(&vault.store, &args.note)?;
    let tag = Tag::new(&args.tag).with_context(|| format!("invalid tag: {}", args.tag))?;
    if vault.store.add_tag(note.id(), &tag)? {
        println!("Tagged \"{}\" with {}", note.title(), tag);
    } else {
        println!("\"{}\" already has tag {}", note.title(), tag);
    }
    Ok(())
}

fn handle_untag(args: &NoteTagArgs, vault: &mut Vault) -> Result<()> {
    let note = require_note(&vault.store, &args.note)?;
    let tag = Tag::new(&args.tag).with_context(|| format!("invalid tag: {}", args.tag))?;
    if vault.store.remove_tag(note.id(), &tag)? {
        println!("Removed tag {} from \"{}\"", tag, note.title());
    } else {
        println!("\"{}\" does not have tag {}", note.title(), tag);
    }
    Ok(())
}

fn handle_attach(args: &NoteAttachArgs, vault: &mut Vault) -> Result<()> {
    let note = require_note(&vault.store, &args.note)?;
    let (attachment, hash) = vault
        .blobs
        .import_file(note.id(), &args.file)
        .with_context(|| format!("failed to copy {}", args.file.display()))?;

    if let Err(e) = vault.store.add_attachment(&attachment) {
        if let Err(cleanup) = vault.blobs.remove(&attachment.storage_path) {
            warn!(error = %cleanup, "failed to remove orphaned attachment file");
        }
        return Err(e).with_context(|| "failed to record attachment");
    }

    println!(
        "Attached {} ({}, {}) to \"{}\"",
        attachment.display_name,
        attachment.mime_type,
        format_size(attachment.size_bytes),
        note.title()
    );
    println!("  sha256 {}", hash);
    Ok(())
}

/// One-line plain-text preview of a note body.
pub(crate) fn preview(note: &AppNote, max_width: usize) -> String {
    let text = to_plain_text(note.body());
    let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_str(&line, max_width)
}
