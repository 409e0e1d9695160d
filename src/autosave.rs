//! The autosave loop: periodic persistence plus revision snapshots.
//!
//! A cancellable scheduled task. `start` hands back a handle; `stop` (or
//! dropping the handle) halts the worker deterministically, so tests and
//! teardown never rely on process exit. Whether the loop should run at all
//! is decided by the caller from `flags.autosave` at start time; toggling
//! the flag takes effect at the next start, not retroactively.

use std::path::PathBuf;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam::channel::{bounded, select, tick, Sender};

use crate::core::{SaveClock, SaveDocument};
use crate::store::{keys, KvStore, RevisionStore};

#[derive(Debug, Clone)]
pub struct AutosaveConfig {
    /// Period of the document re-persist tick.
    pub save_every: Duration,
    /// Period of the revision snapshot tick.
    pub snapshot_every: Duration,
    /// Revisions retained after each snapshot.
    pub keep: usize,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            save_every: Duration::from_secs(30),
            snapshot_every: Duration::from_secs(10),
            keep: crate::store::DEFAULT_KEEP,
        }
    }
}

pub struct AutosaveHandle {
    stop_tx: Sender<()>,
    join: Option<JoinHandle<()>>,
}

impl AutosaveHandle {
    /// Halt the worker and wait for it to finish.
    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

impl Drop for AutosaveHandle {
    fn drop(&mut self) {
        self.halt();
    }
}

/// Spawn the autosave worker over the given stores.
///
/// The revision store is opened inside the worker; if it cannot be opened
/// the loop still runs the save-touch tick and only snapshots are disabled.
pub fn start(store: KvStore, revisions_path: PathBuf, config: AutosaveConfig) -> AutosaveHandle {
    let (stop_tx, stop_rx) = bounded::<()>(1);
    let join = std::thread::spawn(move || {
        let revisions = match RevisionStore::open(&revisions_path) {
            Ok(revisions) => Some(revisions.with_keep(config.keep)),
            Err(err) => {
                tracing::warn!(%err, "revision store unavailable, snapshots disabled");
                None
            }
        };
        let save_tick = tick(config.save_every);
        let snapshot_tick = tick(config.snapshot_every);
        let mut clock = SaveClock::new();

        loop {
            select! {
                recv(stop_rx) -> _ => break,
                recv(save_tick) -> _ => touch_save(&store, &mut clock),
                recv(snapshot_tick) -> _ => {
                    if let Some(revisions) = &revisions {
                        snapshot(&store, revisions);
                    }
                }
            }
        }
    });
    AutosaveHandle {
        stop_tx,
        join: Some(join),
    }
}

/// Re-persist the document with a fresh `updated_at`. No document, no write.
fn touch_save(store: &KvStore, clock: &mut SaveClock) {
    let Some(mut doc) = store.get_json::<SaveDocument>(keys::SAVE) else {
        return;
    };
    doc.meta.updated_at = clock.tick();
    if let Err(err) = store.put_json(keys::SAVE, &doc) {
        tracing::warn!(%err, "autosave persist failed");
    }
}

/// Capture the raw serialized document as a revision; insert trims retention.
fn snapshot(store: &KvStore, revisions: &RevisionStore) {
    let Some(payload) = store.get(keys::SAVE) else {
        return;
    };
    if let Err(err) = revisions.insert(&payload) {
        tracing::warn!(%err, "revision snapshot failed");
    }
}
