//! Slugs, hashing, plain-text extraction, attachment files

mod blobs;
mod content_hash;
mod plain_text;
mod slug;

pub use blobs::{BlobError, BlobStore, OCTET_STREAM, StagedBlobs};
pub use content_hash::{ContentHash, ContentHashError};
pub use plain_text::{strip_html_tags, to_plain_text};
pub use slug::{
    CATEGORY_FALLBACK, SCHOLAR_FALLBACK, SUBCATEGORY_FALLBACK, child_slug, slugify, unique_slug,
};
