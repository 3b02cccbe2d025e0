//! Validation functions over a dataset.
//!
//! Pure functions, testable without a database. The store-side `check`
//! command and the backup importer both run these.

use std::collections::HashSet;

use crate::domain::{Container, Dataset, ValidationIssue, ValidationKind, ValidationSummary};

/// Finds rows sharing an id within each table.
pub fn find_duplicate_ids(data: &Dataset) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let mut check = |table: &str, ids: Vec<&str>| {
        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(id) {
                issues.push(ValidationIssue::new(
                    format!("{} {}", table, id),
                    ValidationKind::DuplicateId { id: id.to_string() },
                ));
            }
        }
    };

    check("scholar", data.scholars.iter().map(|s| s.id.as_str()).collect());
    check("category", data.categories.iter().map(|c| c.id.as_str()).collect());
    check(
        "subcategory",
        data.subcategories.iter().map(|s| s.id.as_str()).collect(),
    );
    check("note", data.notes.iter().map(|n| n.id().as_str()).collect());
    check(
        "attachment",
        data.attachments.iter().map(|a| a.id.as_str()).collect(),
    );

    let mut files = HashSet::new();
    for attachment in &data.attachments {
        if !files.insert(attachment.storage_path.as_str()) {
            issues.push(ValidationIssue::new(
                format!("attachment {}", attachment.id),
                ValidationKind::SharedBlob {
                    storage_path: attachment.storage_path.clone(),
                },
            ));
        }
    }

    issues
}

/// Finds categories and subcategories whose parent is missing, and tags or
/// attachments whose note is missing.
pub fn find_broken_references(data: &Dataset) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let scholar_ids: HashSet<&str> = data.scholars.iter().map(|s| s.id.as_str()).collect();
    for category in &data.categories {
        if !scholar_ids.contains(category.scholar_id.as_str()) {
            issues.push(ValidationIssue::new(
                format!("category {}", category.id),
                ValidationKind::MissingScholar {
                    scholar_id: category.scholar_id.clone(),
                },
            ));
        }
    }

    let category_keys: HashSet<(&str, &str)> = data
        .categories
        .iter()
        .map(|c| (c.scholar_id.as_str(), c.name.as_str()))
        .collect();
    for sub in &data.subcategories {
        if !category_keys.contains(&(sub.scholar_id.as_str(), sub.category_name.as_str())) {
            issues.push(ValidationIssue::new(
                format!("subcategory {}", sub.id),
                ValidationKind::MissingCategory {
                    scholar_id: sub.scholar_id.clone(),
                    category_name: sub.category_name.clone(),
                },
            ));
        }
    }

    let note_ids: HashSet<&str> = data.notes.iter().map(|n| n.id().as_str()).collect();
    for pair in &data.note_tags {
        if !note_ids.contains(pair.note_id.as_str()) {
            issues.push(ValidationIssue::new(
                format!("tag '{}'", pair.tag_name),
                ValidationKind::MissingNote {
                    note_id: pair.note_id.to_string(),
                },
            ));
        }
    }
    for attachment in &data.attachments {
        if !note_ids.contains(attachment.note_id.as_str()) {
            issues.push(ValidationIssue::new(
                format!("attachment {}", attachment.id),
                ValidationKind::MissingNote {
                    note_id: attachment.note_id.to_string(),
                },
            ));
        }
    }

    issues
}

/// Returns every container path that exists in the hierarchy.
///
/// Includes `General Notes`, every `Scholar > Category`, every
/// `Scholar > Category > Subcategory`, and each bare category name (older
/// notes were filed by category name alone).
pub fn known_containers(data: &Dataset) -> HashSet<Container> {
    let mut known = HashSet::new();
    known.insert(Container::general());

    for category in &data.categories {
        if let Ok(bare) = Container::new(&category.name) {
            known.insert(bare);
        }
        if let Some(scholar) = data.scholars.iter().find(|s| s.id == category.scholar_id)
            && let Ok(path) = category.container(scholar)
        {
            known.insert(path);
        }
    }

    for sub in &data.subcategories {
        if let Some(scholar) = data.scholars.iter().find(|s| s.id == sub.scholar_id)
            && let Ok(path) = sub.container(scholar)
        {
            known.insert(path);
        }
    }

    known
}

/// Finds notes filed under a container that names no existing path.
pub fn find_orphaned_containers(data: &Dataset) -> Vec<ValidationIssue> {
    let known = known_containers(data);
    data.notes
        .iter()
        .filter(|note| !known.contains(note.container()))
        .map(|note| {
            ValidationIssue::new(
                format!("note {}", note.id().prefix()),
                ValidationKind::OrphanedContainer {
                    container: note.container().to_string(),
                },
            )
        })
        .collect()
}

/// Finds attachments whose storage path is not among `stored`.
pub fn find_missing_blobs(data: &Dataset, stored: &HashSet<String>) -> Vec<ValidationIssue> {
    data.attachments
        .iter()
        .filter(|a| !stored.contains(&a.storage_path))
        .map(|a| {
            ValidationIssue::new(
                format!("attachment {} ({})", a.id, a.display_name),
                ValidationKind::MissingBlob {
                    storage_path: a.storage_path.clone(),
                },
            )
        })
        .collect()
}

/// Runs the structural checks: duplicate ids, broken references, orphaned
/// containers.
pub fn validate_dataset(data: &Dataset) -> ValidationSummary {
    let mut summary = ValidationSummary::new();
    summary.extend(find_duplicate_ids(data));
    summary.extend(find_broken_references(data));
    summary.extend(find_orphaned_containers(data));
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AppNote, NoteAttachment, NoteTag, Scholar, ScholarCategory, ScholarSubcategory, Tag,
    };

    fn corpus() -> Dataset {
        Dataset {
            scholars: vec![Scholar::new("ibn_taymiyyah", "Ibn Taymiyyah", None, None)],
            categories: vec![ScholarCategory::new(
                "ibn_taymiyyah_aqeedah",
                "ibn_taymiyyah",
                "Aqeedah",
            )],
            subcategories: vec![ScholarSubcategory::new(
                "ibn_taymiyyah_aqeedah_names",
                "ibn_taymiyyah",
                "Aqeedah",
                "Names",
            )],
            ..Default::default()
        }
    }

    fn note_in(id: &str, container: &str) -> AppNote {
        AppNote::builder_with_id(id.parse().unwrap(), "T")
            .container(container.parse().unwrap())
            .build()
    }

    #[test]
    fn clean_corpus_has_no_issues() {
        let mut data = corpus();
        data.notes = vec![
            note_in("a", "General Notes"),
            note_in("b", "Ibn Taymiyyah > Aqeedah"),
            note_in("c", "Ibn Taymiyyah > Aqeedah > Names"),
            note_in("d", "Aqeedah"),
        ];
        assert!(validate_dataset(&data).is_ok());
    }

    #[test]
    fn detects_duplicate_note_ids() {
        let mut data = corpus();
        data.notes = vec![note_in("a", "General Notes"), note_in("a", "General Notes")];
        let issues = find_duplicate_ids(&data);
        assert_eq!(issues.len(), 1);
        assert!(matches!(issues[0].kind, ValidationKind::DuplicateId { .. }));
    }

    #[test]
    fn detects_attachments_sharing_a_file() {
        let mut data = corpus();
        data.notes = vec![note_in("a", "General Notes"), note_in("b", "General Notes")];
        let first = NoteAttachment::new("a".parse().unwrap(), "one.pdf", "application/pdf", 1);
        let mut second =
            NoteAttachment::new("b".parse().unwrap(), "two.pdf", "application/pdf", 1);
        second.storage_path = first.storage_path.clone();
        data.attachments = vec![first, second.clone()];

        let issues = find_duplicate_ids(&data);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].subject, format!("attachment {}", second.id));
        assert!(matches!(issues[0].kind, ValidationKind::SharedBlob { .. }));
        assert!(issues[0].is_error());
    }

    #[test]
    fn detects_category_without_scholar() {
        let mut data = corpus();
        data.categories.push(ScholarCategory::new("x_fiqh", "x", "Fiqh"));
        let issues = find_broken_references(&data);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].subject, "category x_fiqh");
    }

    #[test]
    fn detects_subcategory_without_category() {
        let mut data = corpus();
        data.subcategories.push(ScholarSubcategory::new(
            "s",
            "ibn_taymiyyah",
            "Fiqh",
            "Salah",
        ));
        let issues = find_broken_references(&data);
        assert!(matches!(
            &issues[0].kind,
            ValidationKind::MissingCategory { category_name, .. } if category_name == "Fiqh"
        ));
    }

    #[test]
    fn detects_tags_and_attachments_without_note() {
        let mut data = corpus();
        let ghost: crate::domain::NoteId = "ghost".parse().unwrap();
        data.note_tags.push(NoteTag::new(ghost.clone(), Tag::new("x").unwrap()));
        data.attachments
            .push(NoteAttachment::new(ghost, "a.pdf", "application/pdf", 1));
        assert_eq!(find_broken_references(&data).len(), 2);
    }

    #[test]
    fn renamed_category_orphans_notes() {
        let mut data = corpus();
        data.notes = vec![note_in("a", "Ibn Taymiyyah > Aqeedah")];
        data.categories[0].name = "Creed".to_string();
        data.subcategories.clear();

        let issues = find_orphaned_containers(&data);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity(), crate::domain::Severity::Warning);
    }

    #[test]
    fn missing_blobs_reported_as_warnings() {
        let mut data = corpus();
        let note = note_in("a", "General Notes");
        let attachment = NoteAttachment::new(note.id().clone(), "a.pdf", "application/pdf", 1);
        let path = attachment.storage_path.clone();
        data.notes.push(note);
        data.attachments.push(attachment);

        assert_eq!(find_missing_blobs(&data, &HashSet::new()).len(), 1);
        let stored: HashSet<String> = [path].into_iter().collect();
        assert!(find_missing_blobs(&data, &stored).is_empty());
    }
}
