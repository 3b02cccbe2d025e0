//! SHA256 content hashes for attachment integrity checks.

use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

/// SHA256 hash of attachment bytes.
///
/// Stores a 64-character lowercase hex string. Backups record one per
/// attachment; import recomputes it over the archived bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash {
    hex: String,
}

/// Errors when parsing a content hash from a hex string.
#[derive(Debug, Error)]
pub enum ContentHashError {
    #[error("invalid hex string: expected 64 hex characters, got {0} characters")]
    InvalidLength(usize),

    #[error("invalid hex character at position {position}: '{character}'")]
    InvalidCharacter { position: usize, character: char },
}

impl ContentHash {
    /// Computes a SHA256 hash of the given bytes.
    pub fn compute(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self {
            hex: format!("{:x}", hasher.finalize()),
        }
    }

    /// Creates a ContentHash from a hex string, normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `ContentHashError::InvalidLength` if the string is not 64 characters.
    /// Returns `ContentHashError::InvalidCharacter` if the string contains non-hex characters.
    pub fn from_hex(hex: &str) -> Result<Self, ContentHashError> {
        if hex.len() != 64 {
            return Err(ContentHashError::InvalidLength(hex.len()));
        }

        for (i, c) in hex.chars().enumerate() {
            if !c.is_ascii_hexdigit() {
                return Err(ContentHashError::InvalidCharacter {
                    position: i,
                    character: c,
                });
            }
        }

        Ok(Self {
            hex: hex.to_ascii_lowercase(),
        })
    }

    /// Returns true if `bytes` hash to this value.
    pub fn matches(&self, bytes: &[u8]) -> bool {
        Self::compute(bytes) == *self
    }

    /// Returns the hash as a 64-character lowercase hex string.
    pub fn as_str(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex)
    }
}
