//! Driver loop: record provenance entries, persist, and re-verify.
//!
//! Seeds a directory-backed content store with a dataset and a small shell
//! algorithm, then repeatedly mines a block binding them to the algorithm's
//! output, snapshots the chain to a JSON file, and independently verifies
//! the new block.
//!
//! Run with `cargo run --example provenance_run`.

use anyhow::Context;
use provchain::exec::SubprocessOracle;
use provchain::store::{DirContentStore, JsonSnapshot};
use provchain::{ContentRef, Ledger, LedgerConfig};

const DATASET_ID: &str = "demo-dataset-v1";
const ALGORITHM_ID: &str = "demo-algorithm-v1";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let workdir = tempfile::tempdir().context("creating work directory")?;
    let snapshot = JsonSnapshot::new(workdir.path().join("blockchain.json"));

    // Seed the local content store with the referenced bytes.
    let content = DirContentStore::create(workdir.path().join("content"))
        .context("creating content store")?;
    content.put(&DATASET_ID.into(), b"3,1,4\n1,5,9\n2,6,5\n")?;
    content.put(&ALGORITHM_ID.into(), b"wc -l < \"$1\"\n")?;

    // The "algorithm" is a shell script: interpreter sh, dataset as $1.
    let oracle = SubprocessOracle::new("sh").with_file_names("algorithm.sh", "dataset.csv");

    for round in 0..3 {
        let mut ledger = Ledger::load_or_empty(&snapshot, LedgerConfig::default())
            .context("loading ledger")?;

        let block = ledger
            .record(
                ContentRef::new(DATASET_ID, ALGORITHM_ID),
                &content,
                &oracle,
            )
            .context("recording provenance entry")?;
        println!(
            "round {}: mined block {} (nonce {}, digest {})",
            round, block.index, block.nonce, block.digest
        );

        ledger.persist(&snapshot).context("saving chain snapshot")?;

        let index = ledger.len() - 1;
        if ledger.verify_index(index, &content, &oracle)? {
            println!("round {}: block {} verified successfully", round, index);
        } else {
            println!("round {}: block {} verification failed", round, index);
        }
    }

    Ok(())
}
