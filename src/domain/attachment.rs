//! File attachments and attachment filtering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

use crate::domain::NoteId;

/// Metadata for a file attached to a note.
///
/// The file bytes live in the blob store under `storage_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteAttachment {
    pub id: String,
    pub note_id: NoteId,
    pub display_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub storage_path: String,
}

impl NoteAttachment {
    /// Creates attachment metadata with a fresh id.
    ///
    /// The storage path defaults to the attachment id.
    pub fn new(
        note_id: NoteId,
        display_name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        let id = Ulid::new().to_string();
        Self {
            storage_path: id.clone(),
            id,
            note_id,
            display_name: display_name.into(),
            mime_type: mime_type.into(),
            size_bytes,
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type.to_ascii_lowercase().contains("pdf")
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.to_ascii_lowercase().starts_with("image/")
    }
}

/// Attachment type filter used by attachment listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentFilter {
    #[default]
    All,
    Pdf,
    Image,
}

impl AttachmentFilter {
    /// Returns true when the attachment passes the type filter and its display
    /// name contains `query` (case-insensitive; blank matches everything).
    pub fn matches(&self, attachment: &NoteAttachment, query: &str) -> bool {
        let type_match = match self {
            AttachmentFilter::All => true,
            AttachmentFilter::Pdf => attachment.is_pdf(),
            AttachmentFilter::Image => attachment.is_image(),
        };
        let query = query.trim();
        let name_match = query.is_empty()
            || attachment
                .display_name
                .to_lowercase()
                .contains(&query.to_lowercase());
        type_match && name_match
    }

    /// Applies the filter to a list of attachments.
    pub fn apply<'a>(&self, attachments: &'a [NoteAttachment], query: &str) -> Vec<&'a NoteAttachment> {
        attachments
            .iter()
            .filter(|a| self.matches(a, query))
            .collect()
    }
}

impl fmt::Display for AttachmentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttachmentFilter::All => "all",
            AttachmentFilter::Pdf => "pdf",
            AttachmentFilter::Image => "image",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for AttachmentFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(AttachmentFilter::All),
            "pdf" | "pdfs" => Ok(AttachmentFilter::Pdf),
            "image" | "images" => Ok(AttachmentFilter::Image),
            other => Err(format!("unknown attachment filter '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(name: &str, mime: &str) -> NoteAttachment {
        NoteAttachment::new("n1".parse().unwrap(), name, mime, 10)
    }

    #[test]
    fn new_uses_id_as_storage_path() {
        let a = attachment("a.pdf", "application/pdf");
        assert_eq!(a.storage_path, a.id);
        assert_eq!(a.id.len(), 26);
    }

    #[test]
    fn pdf_filter_matches_mime_substring() {
        let pdf = attachment("Fatawa.pdf", "application/PDF");
        let png = attachment("scan.png", "image/png");
        assert!(AttachmentFilter::Pdf.matches(&pdf, ""));
        assert!(!AttachmentFilter::Pdf.matches(&png, ""));
    }

    #[test]
    fn image_filter_matches_prefix_case_insensitive() {
        let png = attachment("scan.png", "IMAGE/png");
        assert!(AttachmentFilter::Image.matches(&png, ""));
        assert!(!AttachmentFilter::Image.matches(&attachment("x", "text/plain"), ""));
    }

    #[test]
    fn query_filters_display_name() {
        let list = vec![
            attachment("Majmu Fatawa.pdf", "application/pdf"),
            attachment("Riyad.pdf", "application/pdf"),
        ];
        let found = AttachmentFilter::All.apply(&list, "fatawa");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].display_name, "Majmu Fatawa.pdf");
    }

    #[test]
    fn parse_filter_names() {
        assert_eq!("PDFs".parse::<AttachmentFilter>().unwrap(), AttachmentFilter::Pdf);
        assert_eq!("image".parse::<AttachmentFilter>().unwrap(), AttachmentFilter::Image);
        assert!("video".parse::<AttachmentFilter>().is_err());
    }
}
