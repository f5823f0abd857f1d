//! Error types for the Ledger.

use provchain_core::{ChainError, FetchError, MineError, OracleError};
use provchain_store::StoreError;
use thiserror::Error;

/// Errors that can occur during Ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Chain container error.
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    /// Mining error (cancellation).
    #[error("mining error: {0}")]
    Mine(#[from] MineError),

    /// Content could not be fetched while recording; no block can be built.
    #[error("content fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Oracle failed while recording; no output digest can be established.
    #[error("oracle invocation failed: {0}")]
    Oracle(#[from] OracleError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Append rejected: block index does not extend the chain.
    #[error("non-contiguous append: chain length {expected}, block index {got}")]
    NonContiguousIndex { expected: u64, got: u64 },

    /// Append rejected: previous digest does not match the tail.
    #[error("previous digest mismatch at block index {index}")]
    PreviousDigestMismatch { index: u64 },

    /// No block at the requested index.
    #[error("no block at index {0}")]
    UnknownBlock(u64),

    /// A stored block fails the local audit.
    #[error("block {index} fails audit: {reason}")]
    Audit { index: u64, reason: String },
}

/// Result type for Ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
