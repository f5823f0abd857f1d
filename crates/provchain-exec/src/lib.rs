//! # Provchain Exec
//!
//! The subprocess implementation of the [`ComputationOracle`] capability.
//!
//! [`SubprocessOracle`] materializes the algorithm and dataset bytes into a
//! private temporary directory and invokes a configurable interpreter as
//! `interpreter <algorithm-path> <dataset-path>`, capturing the program's
//! output. The directory is removed when the invocation completes, so the
//! exact fetched bytes are what the program sees and nothing else persists.
//!
//! The oracle contract treats the output as opaque: whatever bytes the
//! program emits (diagnostics included) are returned and digested verbatim.
//! Standard output is captured first, standard error appended after it.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use bytes::Bytes;
use tracing::debug;

use provchain_core::{ComputationOracle, OracleError};

/// Default file name the algorithm bytes are materialized under.
pub const DEFAULT_ALGORITHM_FILE: &str = "algorithm.py";

/// Default file name the dataset bytes are materialized under.
pub const DEFAULT_DATASET_FILE: &str = "dataset.csv";

/// Oracle that executes an external interpreter over materialized bytes.
#[derive(Debug, Clone)]
pub struct SubprocessOracle {
    interpreter: PathBuf,
    algorithm_file: String,
    dataset_file: String,
}

impl SubprocessOracle {
    /// An oracle invoking the given interpreter program.
    pub fn new(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            algorithm_file: DEFAULT_ALGORITHM_FILE.to_string(),
            dataset_file: DEFAULT_DATASET_FILE.to_string(),
        }
    }

    /// The conventional `python <algorithm> <dataset>` oracle.
    pub fn python() -> Self {
        Self::new("python")
    }

    /// Override the file names the bytes are materialized under.
    ///
    /// Some interpreters infer behavior from extensions; the names are
    /// otherwise irrelevant to the contract.
    pub fn with_file_names(
        mut self,
        algorithm_file: impl Into<String>,
        dataset_file: impl Into<String>,
    ) -> Self {
        self.algorithm_file = algorithm_file.into();
        self.dataset_file = dataset_file.into();
        self
    }
}

impl ComputationOracle for SubprocessOracle {
    fn run(&self, algorithm: &[u8], dataset: &[u8]) -> Result<Bytes, OracleError> {
        let dir = tempfile::tempdir()?;
        let algorithm_path = dir.path().join(&self.algorithm_file);
        let dataset_path = dir.path().join(&self.dataset_file);
        fs::write(&algorithm_path, algorithm)?;
        fs::write(&dataset_path, dataset)?;

        debug!(
            interpreter = %self.interpreter.display(),
            algorithm_bytes = algorithm.len(),
            dataset_bytes = dataset.len(),
            "invoking computation oracle"
        );

        let output = Command::new(&self.interpreter)
            .arg(&algorithm_path)
            .arg(&dataset_path)
            .output()
            .map_err(|e| OracleError::Launch(e.to_string()))?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        if !output.status.success() {
            return Err(OracleError::ExecutionFailed {
                status: output.status.code(),
                output: String::from_utf8_lossy(&combined).into_owned(),
            });
        }

        Ok(Bytes::from(combined))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh_oracle() -> SubprocessOracle {
        SubprocessOracle::new("sh").with_file_names("algorithm.sh", "dataset.csv")
    }

    #[test]
    fn test_output_is_captured() {
        let oracle = sh_oracle();
        let output = oracle.run(b"cat \"$1\"\n", b"1,2,3\n").unwrap();
        assert_eq!(output, Bytes::from_static(b"1,2,3\n"));
    }

    #[test]
    fn test_stderr_is_part_of_the_output() {
        let oracle = sh_oracle();
        let output = oracle
            .run(b"printf out; printf err >&2\n", b"")
            .unwrap();
        assert_eq!(output, Bytes::from_static(b"outerr"));
    }

    #[test]
    fn test_same_inputs_same_output() {
        let oracle = sh_oracle();
        let a = oracle.run(b"wc -c < \"$1\"\n", b"abc").unwrap();
        let b = oracle.run(b"wc -c < \"$1\"\n", b"abc").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_nonzero_exit_is_execution_failure() {
        let oracle = sh_oracle();
        let result = oracle.run(b"printf partial; exit 3\n", b"");
        match result {
            Err(OracleError::ExecutionFailed { status, output }) => {
                assert_eq!(status, Some(3));
                assert!(output.contains("partial"));
            }
            other => panic!("expected ExecutionFailed, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_interpreter_is_launch_failure() {
        let oracle = SubprocessOracle::new("definitely-not-an-interpreter-7f3a");
        let result = oracle.run(b"", b"");
        assert!(matches!(result, Err(OracleError::Launch(_))));
    }
}
