//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: a seeded in-memory content
//! store, canned oracles, and a quick low-difficulty ledger.

use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use rand::distributions::Alphanumeric;
use rand::Rng;

use provchain::{Ledger, LedgerConfig};
use provchain_core::{
    ComputationOracle, ContentId, ContentRef, Difficulty, OracleError,
};
use provchain_store::MemoryContentStore;

/// Dataset id seeded by [`TestFixture::new`].
pub const DATASET_ID: &str = "D1";

/// Algorithm id seeded by [`TestFixture::new`].
pub const ALGORITHM_ID: &str = "A1";

/// Oracle returning the same canned bytes on every run.
#[derive(Debug, Clone)]
pub struct FixedOracle {
    output: Bytes,
}

impl FixedOracle {
    /// An oracle that always produces `output`.
    pub fn new(output: impl Into<Bytes>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

impl ComputationOracle for FixedOracle {
    fn run(&self, _algorithm: &[u8], _dataset: &[u8]) -> Result<Bytes, OracleError> {
        Ok(self.output.clone())
    }
}

/// Oracle whose every invocation fails with the given exit status.
#[derive(Debug, Clone)]
pub struct FailingOracle {
    status: i32,
}

impl FailingOracle {
    /// An oracle failing with `status`.
    pub fn new(status: i32) -> Self {
        Self { status }
    }
}

impl Default for FailingOracle {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ComputationOracle for FailingOracle {
    fn run(&self, _algorithm: &[u8], _dataset: &[u8]) -> Result<Bytes, OracleError> {
        Err(OracleError::ExecutionFailed {
            status: Some(self.status),
            output: String::new(),
        })
    }
}

/// Fixed oracle that counts invocations, for asserting that verification
/// actually re-runs the computation.
#[derive(Debug, Default)]
pub struct CountingOracle {
    output: Bytes,
    runs: AtomicUsize,
}

impl CountingOracle {
    /// A counting oracle that always produces `output`.
    pub fn new(output: impl Into<Bytes>) -> Self {
        Self {
            output: output.into(),
            runs: AtomicUsize::new(0),
        }
    }

    /// Number of completed invocations.
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::Relaxed)
    }
}

impl ComputationOracle for CountingOracle {
    fn run(&self, _algorithm: &[u8], _dataset: &[u8]) -> Result<Bytes, OracleError> {
        self.runs.fetch_add(1, Ordering::Relaxed);
        Ok(self.output.clone())
    }
}

/// A test fixture with seeded content and a canned oracle.
pub struct TestFixture {
    pub content: MemoryContentStore,
    pub oracle: FixedOracle,
}

impl TestFixture {
    /// Content store seeded with `D1`/`A1`, oracle producing `42`.
    pub fn new() -> Self {
        let content = MemoryContentStore::new();
        content.put(&DATASET_ID.into(), Bytes::from_static(b"1,2,3\n4,5,6\n"));
        content.put(&ALGORITHM_ID.into(), Bytes::from_static(b"print(42)\n"));

        Self {
            content,
            oracle: FixedOracle::new(Bytes::from_static(b"42")),
        }
    }

    /// The seeded dataset/algorithm reference.
    pub fn reference(&self) -> ContentRef {
        ContentRef::new(DATASET_ID, ALGORITHM_ID)
    }

    /// A low-difficulty config so searches finish in a few iterations.
    pub fn quick_config() -> LedgerConfig {
        LedgerConfig {
            difficulty: Difficulty::leading_zeros(1),
            ..LedgerConfig::default()
        }
    }

    /// A ledger with `blocks` entries recorded over the seeded content.
    pub fn quick_ledger(&self, blocks: usize) -> Ledger {
        let mut ledger = Ledger::new(Self::quick_config());
        for _ in 0..blocks {
            ledger
                .record(self.reference(), &self.content, &self.oracle)
                .expect("recording over seeded fixture content");
        }
        ledger
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A random content id with the given prefix, for collision-free test data.
pub fn random_content_id(prefix: &str) -> ContentId {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    ContentId::new(format!("{}-{}", prefix, suffix))
}

/// The subprocess oracle wired to `sh`, for tests that want real execution.
#[cfg(unix)]
pub fn sh_oracle() -> provchain_exec::SubprocessOracle {
    provchain_exec::SubprocessOracle::new("sh").with_file_names("algorithm.sh", "dataset.csv")
}
