//! Error types for the provchain core.

use thiserror::Error;

use crate::digest::Digest;
use crate::reference::ContentId;

/// Errors from the chain container.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The chain holds no blocks, so there is no tail.
    #[error("empty chain")]
    Empty,
}

/// Errors from the proof-of-work search.
#[derive(Debug, Error)]
pub enum MineError {
    /// The caller's cancellation token was triggered mid-search.
    #[error("mining cancelled before a nonce was found")]
    Cancelled,
}

/// Errors from a content store fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("content not found: {0}")]
    NotFound(ContentId),

    #[error("content store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("content store backend error: {0}")]
    Backend(String),
}

/// Errors from a computation oracle invocation.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The oracle program could not be started at all.
    #[error("failed to launch oracle program: {0}")]
    Launch(String),

    /// The oracle program ran but exited unsuccessfully.
    #[error("oracle program failed with status {status:?}: {output}")]
    ExecutionFailed {
        /// Exit status, if the program exited normally.
        status: Option<i32>,
        /// Combined output captured from the failed run, lossily decoded.
        output: String,
    },

    #[error("oracle I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A verification step failure.
///
/// Every variant maps to a `false` verification result; none of them is a
/// fatal condition. [`crate::verify::check_block`] surfaces the first
/// failing step, [`crate::verify::verify_block`] collapses it to a boolean.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("content fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("oracle invocation failed: {0}")]
    Oracle(#[from] OracleError),

    /// Recomputed Merkle root disagrees with the stored one.
    #[error("merkle root mismatch: stored {stored}, recomputed {recomputed}")]
    MerkleMismatch { stored: Digest, recomputed: Digest },

    /// Re-derived output digest disagrees with the stored one.
    #[error("output digest mismatch: stored {stored}, recomputed {recomputed}")]
    OutputMismatch { stored: Digest, recomputed: Digest },
}
