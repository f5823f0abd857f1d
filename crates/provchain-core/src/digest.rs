//! Hex-encoded SHA-256 digests.
//!
//! Digests are carried as lowercase hex strings rather than raw bytes: the
//! Merkle aggregation combines nodes by concatenating their hex encodings,
//! and the block preimage embeds digests verbatim, so the textual form is
//! the canonical one.

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fmt;

/// A SHA-256 digest in lowercase hex, or the empty sentinel.
///
/// The empty digest is a defined value, not an error: it is the Merkle root
/// of an empty reference list and the previous/self digest of the genesis
/// sentinel.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Digest of raw bytes.
    pub fn of_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hex::encode(hasher.finalize()))
    }

    /// Digest of a string's UTF-8 bytes.
    pub fn of_str(s: &str) -> Self {
        Self::of_bytes(s.as_bytes())
    }

    /// The empty sentinel digest.
    pub const fn empty() -> Self {
        Self(String::new())
    }

    /// Whether this is the empty sentinel.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the hex string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = &self.0[..self.0.len().min(16)];
        write!(f, "Digest({})", head)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Digest {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Digest {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
