//! Computation oracle capability: run an algorithm against a dataset.
//!
//! The oracle is handed the exact fetched bytes; where it materializes them
//! (temp files, a sandbox, an RPC boundary) is the adapter's concern. The
//! returned bytes are the literal combined output of the invoked program,
//! diagnostics included; the ledger digests exactly what the oracle
//! returns. Determinism of that output is a precondition the core relies
//! on but does not enforce.

use bytes::Bytes;

use crate::error::OracleError;

/// Execute an algorithm against a dataset and capture its raw output.
pub trait ComputationOracle {
    /// Run `algorithm` against `dataset`, returning the combined output bytes.
    fn run(&self, algorithm: &[u8], dataset: &[u8]) -> Result<Bytes, OracleError>;
}

impl<T: ComputationOracle + ?Sized> ComputationOracle for &T {
    fn run(&self, algorithm: &[u8], dataset: &[u8]) -> Result<Bytes, OracleError> {
        (**self).run(algorithm, dataset)
    }
}
