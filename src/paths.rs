//! XDG directory helpers for config/data locations.

use std::path::PathBuf;

/// Base directory for persistent data (save store, revisions, logs).
///
/// Uses `GC_DATA_DIR` if set, otherwise `$XDG_DATA_HOME/gridcore` or
/// `~/.local/share/gridcore`.
pub(crate) fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("GC_DATA_DIR") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    std::env::var("XDG_DATA_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(".local")
                .join("share")
        })
        .join("gridcore")
}

/// Directory for rolling log files.
pub(crate) fn log_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Base directory for configuration files.
///
/// Uses `GC_CONFIG_DIR` if set, otherwise `$XDG_CONFIG_HOME/gridcore` or
/// `~/.config/gridcore`.
pub(crate) fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("GC_CONFIG_DIR") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(".config")
        })
        .join("gridcore")
}
