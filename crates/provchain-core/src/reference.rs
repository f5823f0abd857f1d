//! Content references: the transaction payload of a block.
//!
//! A reference names a dataset and an algorithm by opaque content address.
//! The referenced bytes are fetched separately through a [`crate::source::ContentStore`]
//! and are never persisted inside a block.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque content-address string naming a blob in an external store.
///
/// The ledger attaches no structure to the identifier beyond equality; a
/// hash-based identifier (e.g. an IPFS CID) is typical but not required.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Create a content id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the identifier string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", self.0)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ContentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ContentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A dataset/algorithm reference pair, immutable once constructed.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentRef {
    /// Content address of the dataset.
    pub dataset: ContentId,
    /// Content address of the algorithm.
    pub algorithm: ContentId,
}

impl ContentRef {
    /// Build a reference from dataset and algorithm content ids.
    pub fn new(dataset: impl Into<ContentId>, algorithm: impl Into<ContentId>) -> Self {
        Self {
            dataset: dataset.into(),
            algorithm: algorithm.into(),
        }
    }

    /// The sentinel reference carried by the genesis block.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether both ids are empty (genesis sentinel).
    pub fn is_empty(&self) -> bool {
        self.dataset.as_str().is_empty() && self.algorithm.as_str().is_empty()
    }

    /// The ordered Merkle leaves for this reference: dataset first.
    pub fn leaves(&self) -> [&str; 2] {
        [self.dataset.as_str(), self.algorithm.as_str()]
    }
}

impl fmt::Debug for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentRef({} / {})", self.dataset, self.algorithm)
    }
}
