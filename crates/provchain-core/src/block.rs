//! Block: the atomic unit of the provenance ledger.
//!
//! A block is immutable once mined. It binds a content reference (dataset +
//! algorithm) to the digest of the output produced by running that algorithm
//! against that dataset, sealed by a proof-of-work digest over a fixed-order
//! preimage of its fields.

use serde::{Deserialize, Serialize};

use crate::digest::Digest;
use crate::merkle::merkle_root;
use crate::reference::ContentRef;

/// The current block schema version.
pub const BLOCK_VERSION: u32 = 1;

/// Block header: linking and commitment fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Schema version (currently 1).
    pub version: u32,

    /// Digest of the preceding block; empty for the genesis sentinel.
    pub previous: Digest,

    /// Merkle root over the transaction's content identifiers.
    pub merkle_root: Digest,

    /// Opaque wall-clock string captured at mining time. Never re-validated.
    pub timestamp: String,
}

/// A complete block: header + transaction + output commitment + seal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain, 0 for the genesis sentinel.
    pub index: u64,

    /// The block header.
    pub header: BlockHeader,

    /// The dataset/algorithm reference this block attests to.
    pub transaction: ContentRef,

    /// Digest of the raw bytes the algorithm produced from the dataset.
    pub output_digest: Digest,

    /// The proof-of-work nonce.
    pub nonce: u64,

    /// Self-digest over [`Block::preimage`]; empty for the genesis sentinel.
    pub digest: Digest,
}

impl Block {
    /// The genesis sentinel: index 0, no predecessor, no transaction.
    ///
    /// Its self-digest is the empty sentinel, so the first mined block
    /// carries an empty `previous` digest. Genesis is exempt from the
    /// difficulty predicate.
    pub fn genesis(timestamp: impl Into<String>) -> Self {
        Self {
            index: 0,
            header: BlockHeader {
                version: BLOCK_VERSION,
                previous: Digest::empty(),
                merkle_root: Digest::empty(),
                timestamp: timestamp.into(),
            },
            transaction: ContentRef::empty(),
            output_digest: Digest::empty(),
            nonce: 0,
            digest: Digest::empty(),
        }
    }

    /// Whether this is the genesis sentinel.
    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    /// The fixed-order textual preimage the self-digest commits to.
    ///
    /// Integers render in decimal, strings verbatim, concatenated with no
    /// separators: index, previous digest, timestamp, Merkle root, dataset
    /// id, algorithm id, nonce. This encoding is byte-exact and stable; any
    /// implementation re-deriving it from the same fields produces the same
    /// bytes.
    pub fn preimage(&self) -> String {
        format!(
            "{}{}{}{}{}{}{}",
            self.index,
            self.header.previous,
            self.header.timestamp,
            self.header.merkle_root,
            self.transaction.dataset,
            self.transaction.algorithm,
            self.nonce
        )
    }

    /// Recompute the self-digest from the current fields.
    pub fn compute_digest(&self) -> Digest {
        Digest::of_str(&self.preimage())
    }

    /// Whether the stored self-digest matches the recomputed one.
    ///
    /// The genesis sentinel carries the empty digest and is consistent by
    /// definition.
    pub fn digest_is_consistent(&self) -> bool {
        if self.is_genesis() {
            self.digest.is_empty()
        } else {
            self.digest == self.compute_digest()
        }
    }

    /// Recompute the Merkle root over this block's transaction leaves.
    pub fn compute_merkle_root(&self) -> Digest {
        merkle_root(&self.transaction.leaves())
    }
}
