//! Validation issue types for the check command and backup import.
//!
//! These types represent integrity problems found in a dataset, such as
//! categories pointing at a missing scholar or notes filed under a container
//! path that no longer exists.

use std::fmt;

/// A validation issue found during checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// The row the issue was found on, e.g. `note 01HQ3K5M7N`.
    pub subject: String,
    /// The kind of validation issue.
    pub kind: ValidationKind,
}

impl ValidationIssue {
    /// Creates a new validation issue.
    pub fn new(subject: impl Into<String>, kind: ValidationKind) -> Self {
        Self {
            subject: subject.into(),
            kind,
        }
    }

    /// Returns the severity of this issue.
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.kind)
    }
}

/// The kind of validation issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationKind {
    /// Two rows of the same table share an id.
    DuplicateId { id: String },

    /// A category references a scholar that does not exist.
    MissingScholar { scholar_id: String },

    /// A subcategory references a category that does not exist.
    MissingCategory {
        scholar_id: String,
        category_name: String,
    },

    /// A tag or attachment references a note that does not exist.
    MissingNote { note_id: String },

    /// A note's container names no existing scholar/category path.
    OrphanedContainer { container: String },

    /// An attachment row has no file in the blob store.
    MissingBlob { storage_path: String },

    /// Two attachment rows point at the same stored file.
    SharedBlob { storage_path: String },
}

impl ValidationKind {
    /// Returns the severity of this kind of issue.
    pub fn severity(&self) -> Severity {
        match self {
            ValidationKind::DuplicateId { .. } => Severity::Error,
            ValidationKind::MissingScholar { .. } => Severity::Error,
            ValidationKind::MissingCategory { .. } => Severity::Error,
            ValidationKind::MissingNote { .. } => Severity::Error,
            ValidationKind::OrphanedContainer { .. } => Severity::Warning,
            ValidationKind::MissingBlob { .. } => Severity::Warning,
            ValidationKind::SharedBlob { .. } => Severity::Error,
        }
    }
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationKind::DuplicateId { id } => write!(f, "duplicate id '{}'", id),
            ValidationKind::MissingScholar { scholar_id } => {
                write!(f, "references missing scholar '{}'", scholar_id)
            }
            ValidationKind::MissingCategory {
                scholar_id,
                category_name,
            } => write!(
                f,
                "references missing category '{}' of scholar '{}'",
                category_name, scholar_id
            ),
            ValidationKind::MissingNote { note_id } => {
                write!(f, "references missing note '{}'", note_id)
            }
            ValidationKind::OrphanedContainer { container } => {
                write!(f, "filed under unknown container '{}'", container)
            }
            ValidationKind::MissingBlob { storage_path } => {
                write!(f, "attachment file missing at '{}'", storage_path)
            }
            ValidationKind::SharedBlob { storage_path } => {
                write!(f, "shares attachment file '{}' with another attachment", storage_path)
            }
        }
    }
}

/// Severity level of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational message.
    Warning,
    /// Problem that should be fixed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Summary of validation results.
#[derive(Debug, Clone, Default)]
pub struct ValidationSummary {
    /// All issues found during validation.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationSummary {
    /// Creates a new empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an issue to the summary.
    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Adds several issues.
    pub fn extend(&mut self, issues: impl IntoIterator<Item = ValidationIssue>) {
        self.issues.extend(issues);
    }

    /// Returns the total number of issues.
    pub fn total(&self) -> usize {
        self.issues.len()
    }

    /// Returns the number of errors.
    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_error()).count()
    }

    /// Returns the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.total() - self.error_count()
    }

    /// Returns true if there are no issues.
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns true if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Returns issues ordered by severity, errors first.
    pub fn issues_by_severity(&self) -> impl Iterator<Item = &ValidationIssue> {
        let mut sorted: Vec<_> = self.issues.iter().collect();
        sorted.sort_by_key(|i| std::cmp::Reverse(i.severity()));
        sorted.into_iter()
    }

    /// Returns only the errors.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.is_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orphan() -> ValidationIssue {
        ValidationIssue::new(
            "note 01HQ3K5M7N",
            ValidationKind::OrphanedContainer {
                container: "Gone > Away".to_string(),
            },
        )
    }

    fn missing_scholar() -> ValidationIssue {
        ValidationIssue::new(
            "category x_fiqh",
            ValidationKind::MissingScholar {
                scholar_id: "x".to_string(),
            },
        )
    }

    #[test]
    fn severities() {
        assert_eq!(orphan().severity(), Severity::Warning);
        assert_eq!(missing_scholar().severity(), Severity::Error);
    }

    #[test]
    fn display_includes_subject_and_kind() {
        assert_eq!(
            orphan().to_string(),
            "note 01HQ3K5M7N: filed under unknown container 'Gone > Away'"
        );
    }

    #[test]
    fn summary_counts() {
        let mut summary = ValidationSummary::new();
        assert!(summary.is_ok());
        summary.add(orphan());
        summary.add(missing_scholar());
        assert_eq!(summary.total(), 2);
        assert_eq!(summary.error_count(), 1);
        assert_eq!(summary.warning_count(), 1);
        assert!(summary.has_errors());
    }

    #[test]
    fn issues_by_severity_puts_errors_first() {
        let mut summary = ValidationSummary::new();
        summary.add(orphan());
        summary.add(missing_scholar());
        let first = summary.issues_by_severity().next().unwrap();
        assert!(first.is_error());
    }
}
