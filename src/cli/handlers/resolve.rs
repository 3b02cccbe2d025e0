//! Note resolution utilities.

use anyhow::{Context, Result, bail};

use crate::domain::{AppNote, NoteId};
use crate::store::NotesRepository;

/// Minimum length of an id prefix accepted for lookup.
const MIN_PREFIX: usize = 4;

/// Result of resolving a note identifier.
#[derive(Debug)]
pub enum ResolveResult {
    /// Exactly one note matched.
    Unique(AppNote),
    /// Multiple notes matched (ambiguous).
    Ambiguous(Vec<AppNote>),
    /// No notes matched.
    NotFound,
}

/// Prints the candidates of an ambiguous identifier.
pub(crate) fn print_ambiguous_notes(identifier: &str, notes: &[AppNote]) {
    eprintln!("Ambiguous: '{}' matches {} notes:", identifier, notes.len());
    for note in notes {
        eprintln!("  {} - {}", note.id().prefix(), note.title());
        eprintln!("      {}", note.container());
    }
    eprintln!();
    eprintln!("Use the ID prefix to specify which note you mean.");
}

/// Resolves a note identifier to a unique note.
///
/// Resolution order:
/// 1. Exact ID
/// 2. ID prefix (case-insensitive, at least 4 characters)
/// 3. Exact title (case-insensitive)
pub fn resolve_note<R: NotesRepository>(store: &R, identifier: &str) -> Result<ResolveResult> {
    let identifier = identifier.trim();

    if let Ok(id) = identifier.parse::<NoteId>()
        && let Some(note) = store
            .get_note(&id)
            .with_context(|| format!("failed to look up note {}", id))?
    {
        return Ok(ResolveResult::Unique(note));
    }

    let notes = store.list_all().with_context(|| "failed to list notes")?;

    if identifier.chars().count() >= MIN_PREFIX {
        let prefix = identifier.to_lowercase();
        let id_matches: Vec<&AppNote> = notes
            .iter()
            .filter(|n| n.id().as_str().to_lowercase().starts_with(&prefix))
            .collect();
        if let [only] = id_matches.as_slice() {
            return Ok(ResolveResult::Unique((*only).clone()));
        }
    }

    let title = identifier.to_lowercase();
    let mut candidates: Vec<AppNote> = notes
        .into_iter()
        .filter(|n| {
            n.title().to_lowercase() == title
                || (title.chars().count() >= MIN_PREFIX
                    && n.id().as_str().to_lowercase().starts_with(&title))
        })
        .collect();
    candidates.sort_by(|a, b| a.id().cmp(b.id()));
    candidates.dedup_by(|a, b| a.id() == b.id());

    Ok(match candidates.len() {
        0 => ResolveResult::NotFound,
        1 => match candidates.pop() {
            Some(note) => ResolveResult::Unique(note),
            None => ResolveResult::NotFound,
        },
        _ => ResolveResult::Ambiguous(candidates),
    })
}

/// Resolves an identifier, failing unless exactly one note matches.
pub(crate) fn require_note<R: NotesRepository>(store: &R, identifier: &str) -> Result<AppNote> {
    match resolve_note(store, identifier)? {
        ResolveResult::Unique(note) => Ok(note),
        ResolveResult::Ambiguous(notes) => {
            print_ambiguous_notes(identifier, &notes);
            bail!("ambiguous note identifier");
        }
        ResolveResult::NotFound => bail!("note not found: '{}'", identifier),
    }
}
