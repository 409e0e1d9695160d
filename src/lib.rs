//! gridcore — local-first save, preferences, and update-merge engine for
//! THE GRID.
//!
//! The durable state is a single JSON save document in a file-backed
//! key-value store, enriched at startup by a deployed updates manifest and
//! language pack, snapshotted into a bounded revision history, and projected
//! into CSS custom properties for the front end.
//!
//! Layering, bottom up:
//!
//! - [`core`] — the save document, merge rules, entitlement table (pure)
//! - [`store`] — key-value persistence and the revision ring
//! - [`fetch`] — prioritized-fallback asset retrieval
//! - [`manager`] — the save lifecycle: load, merge, import/export, init
//! - [`metrics`], [`autosave`], [`ui`] — event log, background loop, CSS
//! - [`config`], [`telemetry`], [`cli`] — the operational shell

#![forbid(unsafe_code)]

pub mod autosave;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod fetch;
pub mod manager;
pub mod metrics;
pub mod store;
pub mod telemetry;
pub mod ui;

pub(crate) mod paths;

pub use error::Error;
pub use manager::SaveManager;

pub type Result<T> = std::result::Result<T, Error>;
