//! In-memory note search and recent-activity helpers.

use std::collections::HashMap;

use crate::domain::{AppNote, NoteId, NoteTag, Tag};
use crate::infra::to_plain_text;

/// Number of notes shown as recent activity.
pub const RECENT_LIMIT: usize = 5;

/// A case-insensitive substring query over notes.
///
/// A note matches when the query occurs in its title, the plain text of its
/// body, its citation, its container path, or any of its tag names. A blank
/// query matches every note.
#[derive(Debug, Clone)]
pub struct NoteQuery {
    needle: String,
}

impl NoteQuery {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.trim().to_lowercase(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.needle.is_empty()
    }

    /// Returns true if the note (with its tags) matches.
    pub fn matches(&self, note: &AppNote, tags: &[Tag]) -> bool {
        if self.is_blank() {
            return true;
        }
        let hit = |s: &str| s.to_lowercase().contains(&self.needle);

        hit(note.title())
            || hit(&to_plain_text(note.body()))
            || hit(note.citation())
            || hit(note.container().as_str())
            || tags.iter().any(|t| t.as_str().contains(&self.needle))
    }

    /// Filters notes, looking tags up in `tags_by_note`.
    pub fn filter<'a>(
        &self,
        notes: &'a [AppNote],
        tags_by_note: &HashMap<NoteId, Vec<Tag>>,
    ) -> Vec<&'a AppNote> {
        notes
            .iter()
            .filter(|n| {
                let tags = tags_by_note.get(n.id()).map(Vec::as_slice).unwrap_or(&[]);
                self.matches(n, tags)
            })
            .collect()
    }
}

/// Groups flat note/tag pairs by note id.
pub fn group_tags(pairs: &[NoteTag]) -> HashMap<NoteId, Vec<Tag>> {
    let mut map: HashMap<NoteId, Vec<Tag>> = HashMap::new();
    for pair in pairs {
        map.entry(pair.note_id.clone())
            .or_default()
            .push(pair.tag_name.clone());
    }
    map
}

/// Returns up to `limit` notes, most recently updated first.
pub fn recent(notes: &[AppNote], limit: usize) -> Vec<&AppNote> {
    let mut sorted: Vec<&AppNote> = notes.iter().collect();
    sorted.sort_by(|a, b| {
        b.updated_at()
            .cmp(&a.updated_at())
            .then_with(|| a.id().cmp(b.id()))
    });
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Container;
    use chrono::{Duration, TimeZone, Utc};

    fn note(id: &str, title: &str) -> AppNote {
        AppNote::builder_with_id(id.parse().unwrap(), title).build()
    }

    #[test]
    fn blank_query_matches_everything() {
        let q = NoteQuery::new("   ");
        assert!(q.is_blank());
        assert!(q.matches(&note("a", "Anything"), &[]));
    }

    #[test]
    fn matches_title_case_insensitively() {
        let q = NoteQuery::new("TAWHEED");
        assert!(q.matches(&note("a", "On Tawheed"), &[]));
        assert!(!q.matches(&note("b", "Salah"), &[]));
    }

    #[test]
    fn matches_plain_text_of_body() {
        let n = AppNote::builder_with_id("a".parse().unwrap(), "T")
            .body("**patience** and prayer")
            .build();
        assert!(NoteQuery::new("patience and").matches(&n, &[]));
    }

    #[test]
    fn matches_citation_and_container() {
        let n = AppNote::builder_with_id("a".parse().unwrap(), "T")
            .citation("Quran 2:153")
            .container(Container::category("Ibn Taymiyyah", "Aqeedah").unwrap())
            .build();
        assert!(NoteQuery::new("2:153").matches(&n, &[]));
        assert!(NoteQuery::new("aqeedah").matches(&n, &[]));
    }

    #[test]
    fn matches_tags() {
        let n = note("a", "T");
        let tags = vec![Tag::new("fiqh").unwrap()];
        assert!(NoteQuery::new("Fiq").matches(&n, &tags));
    }

    #[test]
    fn filter_uses_grouped_tags() {
        let notes = vec![note("a", "One"), note("b", "Two")];
        let pairs = vec![NoteTag::new("b".parse().unwrap(), Tag::new("hadith").unwrap())];
        let grouped = group_tags(&pairs);
        let found = NoteQuery::new("hadith").filter(&notes, &grouped);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title(), "Two");
    }

    #[test]
    fn recent_orders_by_updated_at_and_limits() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let notes: Vec<AppNote> = (0..7)
            .map(|i| {
                AppNote::builder_with_id(format!("n{}", i).parse().unwrap(), format!("N{}", i))
                    .updated_at(base + Duration::hours(i))
                    .build()
            })
            .collect();

        let top = recent(&notes, RECENT_LIMIT);
        let titles: Vec<&str> = top.iter().map(|n| n.title()).collect();
        assert_eq!(titles, vec!["N6", "N5", "N4", "N3", "N2"]);
    }
}
