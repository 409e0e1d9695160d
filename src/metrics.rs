//! Interaction event log.
//!
//! Append-only records `{sid, t, event, ...payload}` persisted under
//! `grid_metrics_log`, exportable and clearable on demand. The log is
//! size-capped by serialized byte length; overflow evicts whole records
//! oldest-first, so the stored log is always valid JSON. The session id is
//! generated once per data dir and persisted under `grid_sid`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::WallMs;
use crate::store::{keys, KvStore, StoreError};

pub const DEFAULT_MAX_LOG_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEvent {
    pub sid: String,
    pub t: WallMs,
    pub event: String,
    #[serde(flatten)]
    pub payload: BTreeMap<String, Value>,
}

pub struct MetricsRecorder {
    store: KvStore,
    sid: String,
    max_bytes: usize,
}

impl MetricsRecorder {
    /// Open the recorder, establishing the session id on first access.
    pub fn new(store: KvStore) -> Result<Self, StoreError> {
        let sid = match store.get(keys::SID) {
            Some(existing) if !existing.trim().is_empty() => existing.trim().to_string(),
            _ => {
                let fresh = uuid::Uuid::new_v4().to_string();
                store.put(keys::SID, &fresh)?;
                fresh
            }
        };
        Ok(Self {
            store,
            sid,
            max_bytes: DEFAULT_MAX_LOG_BYTES,
        })
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn sid(&self) -> &str {
        &self.sid
    }

    /// Append an event, evicting oldest records if the serialized log would
    /// exceed the byte budget.
    pub fn track(
        &self,
        event: &str,
        payload: BTreeMap<String, Value>,
    ) -> Result<(), StoreError> {
        let mut log = self.events();
        log.push(MetricEvent {
            sid: self.sid.clone(),
            t: WallMs::now(),
            event: event.to_string(),
            payload,
        });
        let evicted = evict_to_budget(&mut log, self.max_bytes);
        if evicted > 0 {
            tracing::debug!(evicted, "metrics log over budget, dropped oldest records");
        }
        if log.is_empty() {
            tracing::warn!(event, "metric event larger than the whole log budget, dropped");
        }
        self.store.put_json(keys::METRICS_LOG, &log)
    }

    /// The full log, oldest-to-newest. Absent or corrupt logs read as empty.
    pub fn events(&self) -> Vec<MetricEvent> {
        self.store
            .get_json::<Vec<MetricEvent>>(keys::METRICS_LOG)
            .unwrap_or_default()
    }

    /// Pretty-printed blob of the full log for manual export.
    pub fn export(&self) -> String {
        serde_json::to_string_pretty(&self.events()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.put(keys::METRICS_LOG, "[]")
    }
}

/// Drop records from the front until the serialized log fits `max_bytes`.
/// Returns the number of evicted records.
fn evict_to_budget(log: &mut Vec<MetricEvent>, max_bytes: usize) -> usize {
    let mut evicted = 0;
    while !log.is_empty() && serialized_len(log) > max_bytes {
        log.remove(0);
        evicted += 1;
    }
    evicted
}

fn serialized_len(log: &[MetricEvent]) -> usize {
    serde_json::to_string(log).map(|s| s.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn recorder() -> (tempfile::TempDir, MetricsRecorder) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = KvStore::open(dir.path()).expect("open");
        let recorder = MetricsRecorder::new(store).expect("recorder");
        (dir, recorder)
    }

    #[test]
    fn track_appends_well_formed_records_with_stable_sid() {
        let (_dir, recorder) = recorder();
        for _ in 0..5 {
            recorder.track("click", BTreeMap::new()).expect("track");
        }
        let events = recorder.events();
        assert_eq!(events.len(), 5);
        for event in &events {
            assert_eq!(event.sid, recorder.sid());
            assert_eq!(event.event, "click");
            assert!(event.t.0 > 0);
        }
    }

    #[test]
    fn sid_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = KvStore::open(dir.path()).expect("open");
        let first = MetricsRecorder::new(store.clone()).expect("recorder");
        let sid = first.sid().to_string();
        drop(first);
        let second = MetricsRecorder::new(store).expect("recorder");
        assert_eq!(second.sid(), sid);
    }

    #[test]
    fn overflow_evicts_oldest_whole_records() {
        let (_dir, recorder) = recorder();
        let recorder = recorder.with_max_bytes(600);
        for i in 0..20 {
            let mut payload = BTreeMap::new();
            payload.insert("n".to_string(), json!(i));
            recorder.track("scroll", payload).expect("track");
        }
        let events = recorder.events();
        assert!(!events.is_empty());
        assert!(events.len() < 20, "older records must have been evicted");
        // survivors are the most recent, still in order
        let ns: Vec<i64> = events
            .iter()
            .map(|e| e.payload["n"].as_i64().unwrap())
            .collect();
        let expected: Vec<i64> = (20 - events.len() as i64..20).collect();
        assert_eq!(ns, expected);
        // and the persisted blob is valid JSON end to end
        let raw = recorder.export();
        serde_json::from_str::<Vec<MetricEvent>>(&raw).expect("export parses");
    }

    #[test]
    fn clear_empties_the_log() {
        let (_dir, recorder) = recorder();
        recorder.track("click", BTreeMap::new()).expect("track");
        recorder.clear().expect("clear");
        assert!(recorder.events().is_empty());
    }
}
