//! Proof-of-work mining: the nonce search that admits a block.
//!
//! The search iterates nonce = 0, 1, 2, ... with no upper bound, recomputing
//! the candidate digest each step until the difficulty predicate admits it.
//! Non-termination is a liveness property, not an error; the only in-band
//! failure is cancellation through an injected token.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::block::{Block, BlockHeader, BLOCK_VERSION};
use crate::digest::Digest;
use crate::error::MineError;
use crate::merkle::merkle_root;
use crate::reference::ContentRef;

/// Hex-character prefix length of the standard difficulty predicate.
pub const STANDARD_PREFIX_LEN: usize = 4;

/// The difficulty predicate: a required prefix of `0` hex characters.
///
/// The protocol fixes the standard predicate at 4 leading zeros; the length
/// is injectable so callers (and tests) can bound search time without
/// changing the algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Difficulty {
    zeros: usize,
}

impl Difficulty {
    /// The fixed protocol difficulty: 4 leading zero hex characters.
    pub const STANDARD: Self = Self {
        zeros: STANDARD_PREFIX_LEN,
    };

    /// A predicate requiring `zeros` leading zero hex characters.
    pub const fn leading_zeros(zeros: usize) -> Self {
        Self { zeros }
    }

    /// Whether `digest` satisfies the predicate.
    pub fn admits(&self, digest: &Digest) -> bool {
        let s = digest.as_str().as_bytes();
        s.len() >= self.zeros && s[..self.zeros].iter().all(|&b| b == b'0')
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Cooperative cancellation for the nonce search.
///
/// Clones share one flag. The search checks the token every iteration and
/// returns [`MineError::Cancelled`] without producing a block; a cancelled
/// search has no other effect.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create an untriggered token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was triggered.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The proof-of-work miner.
#[derive(Debug, Clone)]
pub struct Miner {
    /// Difficulty predicate candidate digests must satisfy.
    pub difficulty: Difficulty,
    /// Header version stamped on mined blocks.
    pub version: u32,
}

impl Default for Miner {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::STANDARD,
            version: BLOCK_VERSION,
        }
    }
}

impl Miner {
    /// A miner with the given difficulty and the current block version.
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            version: BLOCK_VERSION,
        }
    }

    /// Mine the successor of `previous` binding `reference` to `output_digest`.
    ///
    /// `timestamp` is captured once by the caller at call start and carried
    /// opaquely. Blocks until a nonce is found; the search is unbounded and
    /// CPU-bound by design.
    pub fn mine(
        &self,
        previous: &Block,
        reference: ContentRef,
        output_digest: Digest,
        timestamp: impl Into<String>,
    ) -> Block {
        match self.search(previous, reference, output_digest, timestamp.into(), None) {
            Ok(block) => block,
            // No token was supplied, so cancellation cannot occur.
            Err(MineError::Cancelled) => unreachable!("cancelled without a token"),
        }
    }

    /// Like [`Miner::mine`], but checks `cancel` on every iteration.
    pub fn mine_cancellable(
        &self,
        previous: &Block,
        reference: ContentRef,
        output_digest: Digest,
        timestamp: impl Into<String>,
        cancel: &CancelToken,
    ) -> Result<Block, MineError> {
        self.search(
            previous,
            reference,
            output_digest,
            timestamp.into(),
            Some(cancel),
        )
    }

    fn search(
        &self,
        previous: &Block,
        reference: ContentRef,
        output_digest: Digest,
        timestamp: String,
        cancel: Option<&CancelToken>,
    ) -> Result<Block, MineError> {
        let merkle = merkle_root(&reference.leaves());
        let mut candidate = Block {
            index: previous.index + 1,
            header: BlockHeader {
                version: self.version,
                previous: previous.digest.clone(),
                merkle_root: merkle,
                timestamp,
            },
            transaction: reference,
            output_digest,
            nonce: 0,
            digest: Digest::empty(),
        };

        loop {
            if let Some(token) = cancel {
                if token.is_cancelled() {
                    return Err(MineError::Cancelled);
                }
            }

            let digest = candidate.compute_digest();
            if self.difficulty.admits(&digest) {
                candidate.digest = digest;
                return Ok(candidate);
            }
            candidate.nonce += 1;
        }
    }
}
