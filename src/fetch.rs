//! Best-effort prioritized-fallback reads of deployed JSON documents.
//!
//! Candidates are tried once each, in order, with no backoff: a miss means
//! "not deployed here", not "transient". All failures degrade to `None` and
//! are only visible on the diagnostic channel.

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("read failed for `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse failed for `{path}`: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A source of deployed JSON documents, addressed by relative path.
pub trait Fetcher {
    fn fetch(&self, path: &str) -> Result<Value, FetchError>;
}

/// Reads documents from a deploy/assets directory on disk.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Fetcher for FsFetcher {
    fn fetch(&self, path: &str) -> Result<Value, FetchError> {
        let full = self.root.join(path);
        let contents = std::fs::read_to_string(&full).map_err(|source| FetchError::Io {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| FetchError::Parse {
            path: path.to_string(),
            source,
        })
    }
}

/// A fetcher with nothing deployed. Everything misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFetcher;

impl Fetcher for NullFetcher {
    fn fetch(&self, path: &str) -> Result<Value, FetchError> {
        Err(FetchError::Io {
            path: path.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "null fetcher"),
        })
    }
}

/// Try each candidate in order; return the first successfully parsed body.
/// Stops at the first success, never retries a path, returns `None` when
/// every candidate fails.
pub fn fetch_first<S: AsRef<str>>(fetcher: &dyn Fetcher, candidates: &[S]) -> Option<Value> {
    for candidate in candidates {
        let path = candidate.as_ref();
        match fetcher.fetch(path) {
            Ok(value) => {
                tracing::debug!(path, "fetched");
                return Some(value);
            }
            Err(err) => {
                tracing::debug!(path, %err, "candidate missed");
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;

    use serde_json::json;

    struct ScriptedFetcher {
        bodies: Vec<Option<Value>>,
        calls: RefCell<Vec<String>>,
    }

    impl Fetcher for ScriptedFetcher {
        fn fetch(&self, path: &str) -> Result<Value, FetchError> {
            let mut calls = self.calls.borrow_mut();
            let idx = calls.len();
            calls.push(path.to_string());
            match self.bodies.get(idx).cloned().flatten() {
                Some(value) => Ok(value),
                None => Err(FetchError::Io {
                    path: path.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
                }),
            }
        }
    }

    #[test]
    fn returns_third_candidate_without_trying_fourth() {
        let fetcher = ScriptedFetcher {
            bodies: vec![None, None, Some(json!({"version": "3"})), Some(json!({}))],
            calls: RefCell::new(Vec::new()),
        };
        let got = fetch_first(&fetcher, &["a.json", "b.json", "c.json", "d.json"]);
        assert_eq!(got, Some(json!({"version": "3"})));
        assert_eq!(
            *fetcher.calls.borrow(),
            vec!["a.json", "b.json", "c.json"],
            "must stop at the first success"
        );
    }

    #[test]
    fn all_misses_yield_none() {
        let fetcher = ScriptedFetcher {
            bodies: vec![None, None],
            calls: RefCell::new(Vec::new()),
        };
        assert_eq!(fetch_first(&fetcher, &["a.json", "b.json"]), None);
    }

    #[test]
    fn fs_fetcher_reads_relative_to_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("data")).expect("mkdir");
        std::fs::write(dir.path().join("data/updates.json"), r#"{"version":"9"}"#)
            .expect("write");
        let fetcher = FsFetcher::new(dir.path());
        let got = fetch_first(&fetcher, &["updates.json", "data/updates.json"]);
        assert_eq!(got, Some(json!({"version": "9"})));
    }

    #[test]
    fn malformed_body_counts_as_a_miss() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("bad.json"), "{oops").expect("write");
        let fetcher = FsFetcher::new(dir.path());
        assert_eq!(fetch_first(&fetcher, &["bad.json"]), None);
    }
}
