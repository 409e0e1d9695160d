//! Durable stores: the flat key-value store and the revision store.
//!
//! The two stores are independently consistent; nothing couples them
//! atomically. The KV store is the canonical home of the save document and
//! the auxiliary flat keys; the revision store holds short-term autosave
//! snapshots.

mod kv;
mod revisions;

pub use kv::{KvStore, StoreError};
pub use revisions::{Revision, RevisionError, RevisionStore, DEFAULT_KEEP};

/// Flat keys this crate owns. Other site surfaces keep their own flat keys
/// in the same namespace; those are not mirrored here.
pub mod keys {
    /// The singleton save document.
    pub const SAVE: &str = "gc_owner_core_save_v1.3";

    pub const PLAN: &str = "grid.plan";
    pub const SID: &str = "grid_sid";
    pub const METRICS_LOG: &str = "grid_metrics_log";
    pub const CANARY_COHORT: &str = "grid_canary_cohort";
}
