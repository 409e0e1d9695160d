//! SQLite-backed autosave revision store.
//!
//! Bounded retention: every insert is followed by a trim that deletes the
//! oldest excess rows, keeping only the most recent `keep`. Revisions are
//! short-term rollback/debugging snapshots, not a version history.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use thiserror::Error;

use crate::core::WallMs;

pub const DEFAULT_KEEP: usize = 10;

const SCHEMA_VERSION: u32 = 1;
const BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Error)]
pub enum RevisionError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("revision schema version mismatch: expected {expected}, got {got}")]
    SchemaVersionMismatch { expected: u32, got: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Revision {
    pub id: i64,
    /// Opaque snapshot payload (the serialized save document).
    pub payload: String,
    pub ts: WallMs,
}

pub struct RevisionStore {
    conn: Connection,
    keep: usize,
}

impl RevisionStore {
    pub fn open(path: &Path) -> Result<Self, RevisionError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| RevisionError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self, RevisionError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, RevisionError> {
        conn.busy_timeout(std::time::Duration::from_millis(BUSY_TIMEOUT_MS))?;
        conn.pragma_update(None, "journal_mode", "WAL").ok();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS meta (
                 key TEXT PRIMARY KEY,
                 value TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS revisions (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 ts INTEGER NOT NULL,
                 payload TEXT NOT NULL
             );",
        )?;

        let existing: Option<String> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        match existing {
            Some(raw) => {
                let got: u32 = raw.parse().unwrap_or(0);
                if got != SCHEMA_VERSION {
                    return Err(RevisionError::SchemaVersionMismatch {
                        expected: SCHEMA_VERSION,
                        got,
                    });
                }
            }
            None => {
                conn.execute(
                    "INSERT INTO meta (key, value) VALUES ('schema_version', ?1)",
                    params![SCHEMA_VERSION.to_string()],
                )?;
            }
        }

        Ok(Self {
            conn,
            keep: DEFAULT_KEEP,
        })
    }

    pub fn with_keep(mut self, keep: usize) -> Self {
        self.keep = keep.max(1);
        self
    }

    pub fn keep(&self) -> usize {
        self.keep
    }

    /// Append a snapshot, then trim to the most recent `keep` rows.
    pub fn insert(&self, payload: &str) -> Result<i64, RevisionError> {
        self.conn.execute(
            "INSERT INTO revisions (ts, payload) VALUES (?1, ?2)",
            params![WallMs::now().0 as i64, payload],
        )?;
        let id = self.conn.last_insert_rowid();
        self.trim()?;
        Ok(id)
    }

    fn trim(&self) -> Result<(), RevisionError> {
        self.conn.execute(
            "DELETE FROM revisions WHERE id NOT IN (
                 SELECT id FROM revisions ORDER BY id DESC LIMIT ?1
             )",
            params![self.keep as i64],
        )?;
        Ok(())
    }

    /// Surviving revisions, oldest-to-newest by insertion.
    pub fn list(&self) -> Result<Vec<Revision>, RevisionError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, ts, payload FROM revisions ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(Revision {
                id: row.get(0)?,
                ts: WallMs(row.get::<_, i64>(1)? as u64),
                payload: row.get(2)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn len(&self) -> Result<usize, RevisionError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM revisions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool, RevisionError> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retains_only_the_most_recent_keep() {
        let store = RevisionStore::open_in_memory().expect("open");
        for i in 0..25 {
            store.insert(&format!("snapshot-{i}")).expect("insert");
        }
        let revisions = store.list().expect("list");
        assert_eq!(revisions.len(), DEFAULT_KEEP);
        // oldest-to-newest, and exactly the last ten inserted
        let payloads: Vec<&str> = revisions.iter().map(|r| r.payload.as_str()).collect();
        let expected: Vec<String> = (15..25).map(|i| format!("snapshot-{i}")).collect();
        assert_eq!(
            payloads,
            expected.iter().map(String::as_str).collect::<Vec<_>>()
        );
    }

    #[test]
    fn custom_keep_is_honored() {
        let store = RevisionStore::open_in_memory().expect("open").with_keep(3);
        for i in 0..5 {
            store.insert(&format!("s{i}")).expect("insert");
        }
        assert_eq!(store.len().expect("len"), 3);
    }

    #[test]
    fn reopen_checks_schema_version() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("revisions.sqlite");
        {
            let store = RevisionStore::open(&path).expect("open");
            store.insert("x").expect("insert");
        }
        let store = RevisionStore::open(&path).expect("reopen");
        assert_eq!(store.len().expect("len"), 1);
    }
}
