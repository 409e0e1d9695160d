//! File-backed key-value store, one file per key.
//!
//! The namespace (directory) is a constructor parameter so tests and
//! embedders can isolate state. Reads are forgiving: an absent or corrupt
//! entry is `None`, never an error. Writes are atomic (temp file + rename
//! in the same directory).

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialize failed for key `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("temp file persist failed at {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

#[derive(Debug, Clone)]
pub struct KvStore {
    dir: PathBuf,
}

impl KvStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        // Keys are flat names; path separators would escape the namespace.
        let safe: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.dir.join(safe)
    }

    /// Raw read. Absent and unreadable entries are both `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(contents) => Some(contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::debug!(key, %err, "kv read failed, treating as absent");
                None
            }
        }
    }

    /// JSON read. A parse failure is treated as absent (logged at debug).
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!(key, %err, "kv entry corrupt, treating as absent");
                None
            }
        }
    }

    pub fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.atomic_write(&self.key_path(key), value.as_bytes())
    }

    pub fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.put(key, &raw)
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.key_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.key_path(key).exists()
    }

    fn atomic_write(&self, path: &Path, data: &[u8]) -> Result<(), StoreError> {
        let temp = tempfile::NamedTempFile::new_in(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(temp.path(), data).map_err(|source| StoreError::Io {
            path: temp.path().to_path_buf(),
            source,
        })?;
        temp.persist(path).map_err(|source| StoreError::Persist {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = KvStore::open(dir.path()).expect("open");
        store.put("grid.plan", "gold").expect("put");
        assert_eq!(store.get("grid.plan").as_deref(), Some("gold"));
        assert!(store.get("grid.profile").is_none());
    }

    #[test]
    fn corrupt_json_reads_as_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = KvStore::open(dir.path()).expect("open");
        store.put("doc", "{not json").expect("put");
        assert!(store.get_json::<serde_json::Value>("doc").is_none());
        // raw read still sees the bytes
        assert!(store.get("doc").is_some());
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = KvStore::open(dir.path()).expect("open");
        store.put("k", "v").expect("put");
        store.remove("k").expect("remove");
        store.remove("k").expect("remove again");
        assert!(!store.contains("k"));
    }

    #[test]
    fn keys_cannot_escape_the_namespace() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = KvStore::open(dir.path()).expect("open");
        store.put("../escape", "v").expect("put");
        assert_eq!(store.get("../escape").as_deref(), Some("v"));
        assert!(!dir.path().parent().unwrap().join("escape").exists());
    }
}
