//! SQLite-backed persistence: chain snapshot rows plus a content blob table.
//!
//! One database serves both concerns: the `blocks` table is the chain
//! snapshot (one row per block, replaced wholesale on save), and the
//! `content` table is a local content-addressable store behind the core
//! [`ContentStore`] capability.

use std::path::Path;
use std::sync::Mutex;

use bytes::Bytes;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use provchain_core::{
    Block, BlockHeader, ContentId, ContentRef, ContentStore, Digest, FetchError, HashChain,
};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::snapshot::SnapshotStore;

/// SQLite-based store.
///
/// Thread-safe via an internal mutex; all calls are blocking, matching the
/// ledger's single-writer synchronous model.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Store content bytes under `id`, replacing any previous entry.
    ///
    /// The core consumes only the fetch path; this write path exists so a
    /// local database can be seeded with the referenced content.
    pub fn put_content(&self, id: &ContentId, bytes: &[u8]) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO content (content_id, bytes) VALUES (?1, ?2)",
                params![id.as_str(), bytes],
            )?;
            Ok(())
        })
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Backend("connection mutex poisoned".to_string()))?;
        f(&conn)
    }

    fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Backend("connection mutex poisoned".to_string()))?;
        f(&mut conn)
    }
}

/// Map a `blocks` row to a Block. Nothing is recomputed; stored digests and
/// nonces are taken verbatim.
fn row_to_block(row: &rusqlite::Row<'_>) -> rusqlite::Result<Block> {
    let index: i64 = row.get("idx")?;
    let version: u32 = row.get("version")?;
    let previous: String = row.get("previous")?;
    let merkle_root: String = row.get("merkle_root")?;
    let timestamp: String = row.get("timestamp")?;
    let dataset_id: String = row.get("dataset_id")?;
    let algorithm_id: String = row.get("algorithm_id")?;
    let output_digest: String = row.get("output_digest")?;
    let nonce: i64 = row.get("nonce")?;
    let digest: String = row.get("digest")?;

    Ok(Block {
        index: index as u64,
        header: BlockHeader {
            version,
            previous: Digest::from(previous),
            merkle_root: Digest::from(merkle_root),
            timestamp,
        },
        transaction: ContentRef::new(dataset_id, algorithm_id),
        output_digest: Digest::from(output_digest),
        nonce: nonce as u64,
        digest: Digest::from(digest),
    })
}

impl SnapshotStore for SqliteStore {
    fn save(&self, chain: &HashChain) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            tx.execute("DELETE FROM blocks", [])?;
            for block in chain {
                tx.execute(
                    "INSERT INTO blocks (idx, version, previous, merkle_root, timestamp,
                                         dataset_id, algorithm_id, output_digest, nonce, digest)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    params![
                        block.index as i64,
                        block.header.version,
                        block.header.previous.as_str(),
                        block.header.merkle_root.as_str(),
                        block.header.timestamp,
                        block.transaction.dataset.as_str(),
                        block.transaction.algorithm.as_str(),
                        block.output_digest.as_str(),
                        block.nonce as i64,
                        block.digest.as_str(),
                    ],
                )?;
            }

            tx.commit()?;
            debug!(blocks = chain.len(), "saved chain snapshot to sqlite");
            Ok(())
        })
    }

    fn load(&self) -> Result<HashChain> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT idx, version, previous, merkle_root, timestamp,
                        dataset_id, algorithm_id, output_digest, nonce, digest
                 FROM blocks ORDER BY idx",
            )?;

            let blocks = stmt
                .query_map([], row_to_block)?
                .collect::<std::result::Result<Vec<Block>, _>>()?;

            for (position, block) in blocks.iter().enumerate() {
                if block.index != position as u64 {
                    return Err(StoreError::Corrupt(format!(
                        "block index {} at chain position {}",
                        block.index, position
                    )));
                }
            }

            debug!(blocks = blocks.len(), "loaded chain snapshot from sqlite");
            Ok(HashChain::from_blocks(blocks))
        })
    }
}

impl ContentStore for SqliteStore {
    fn fetch(&self, id: &ContentId) -> std::result::Result<Bytes, FetchError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| FetchError::Backend("connection mutex poisoned".to_string()))?;

        let row: Option<Vec<u8>> = conn
            .query_row(
                "SELECT bytes FROM content WHERE content_id = ?1",
                params![id.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| FetchError::Backend(e.to_string()))?;

        match row {
            Some(bytes) => Ok(Bytes::from(bytes)),
            None => Err(FetchError::NotFound(id.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use provchain_core::{ContentRef, Difficulty, Miner};

    fn mined_chain() -> HashChain {
        let miner = Miner::new(Difficulty::leading_zeros(1));
        let mut chain = HashChain::new();
        chain.push(Block::genesis("0"));

        for i in 0..3u64 {
            let block = miner.mine(
                chain.tail().unwrap(),
                ContentRef::new(format!("D{}", i), format!("A{}", i)),
                Digest::of_bytes(format!("out-{}", i).as_bytes()),
                format!("{}", i + 1),
            );
            chain.push(block);
        }
        chain
    }

    #[test]
    fn test_snapshot_roundtrip_in_memory() {
        let store = SqliteStore::open_memory().unwrap();
        let chain = mined_chain();

        store.save(&chain).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(chain, loaded);
    }

    #[test]
    fn test_snapshot_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");
        let chain = mined_chain();

        {
            let store = SqliteStore::open(&path).unwrap();
            store.save(&chain).unwrap();
        }

        // Reopen the file: the chain must come back verbatim.
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.load().unwrap(), chain);
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let store = SqliteStore::open_memory().unwrap();
        let chain = mined_chain();

        store.save(&chain).unwrap();
        let mut shorter = HashChain::new();
        shorter.push(Block::genesis("0"));
        store.save(&shorter).unwrap();

        assert_eq!(store.load().unwrap(), shorter);
    }

    #[test]
    fn test_fresh_database_loads_empty_chain() {
        let store = SqliteStore::open_memory().unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_content_put_then_fetch() {
        let store = SqliteStore::open_memory().unwrap();
        let id = ContentId::new("D1");
        store.put_content(&id, b"1,2,3").unwrap();

        assert_eq!(store.fetch(&id).unwrap(), Bytes::from_static(b"1,2,3"));
    }

    #[test]
    fn test_content_missing_is_not_found() {
        let store = SqliteStore::open_memory().unwrap();
        let result = store.fetch(&ContentId::new("absent"));
        assert!(matches!(result, Err(FetchError::NotFound(_))));
    }
}
