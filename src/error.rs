use thiserror::Error;

use crate::config::ConfigError;
use crate::manager::ImportError;
use crate::store::{RevisionError, StoreError};

/// Crate-level convenience error.
///
/// A thin wrapper over the per-module errors; nothing in the save layer is
/// fatal, so callers mostly log these and continue degraded.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Revision(#[from] RevisionError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("serialization failed: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
