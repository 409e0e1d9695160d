use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::merge::{apply_env_overrides, merge_layers};
use super::{Config, ConfigLayer};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

pub fn config_path() -> PathBuf {
    crate::paths::config_dir().join("config.toml")
}

/// Site-local layer, next to the deployed assets.
pub fn site_config_path(assets_root: &Path) -> PathBuf {
    assets_root.join("grid.toml")
}

pub fn load_user_config() -> Result<Option<ConfigLayer>, ConfigError> {
    load_layer(&config_path())
}

pub fn load_site_config(assets_root: &Path) -> Result<Option<ConfigLayer>, ConfigError> {
    load_layer(&site_config_path(assets_root))
}

fn load_layer(path: &Path) -> Result<Option<ConfigLayer>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

pub fn load(assets_root: Option<&Path>) -> Result<Config, ConfigError> {
    let user = load_user_config()?;
    let site = match assets_root {
        Some(root) => load_site_config(root)?,
        None => None,
    };
    let mut config = merge_layers(user, site);
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Load, degrading to defaults on failure; write a default user config on
/// first run.
pub fn load_or_init(assets_root: Option<&Path>) -> Config {
    let path = config_path();
    let had_user_config = path.exists();

    let config = match load(assets_root) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("config load failed, using defaults: {e}");
            let mut cfg = Config::default();
            apply_env_overrides(&mut cfg);
            cfg
        }
    };

    if !had_user_config {
        if let Err(e) = write_config(&path, &Config::default()) {
            tracing::warn!("failed to write default config: {e}");
        }
    }

    config
}

pub fn write_config(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| ConfigError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let contents = toml::to_string_pretty(cfg).map_err(|e| ConfigError::Write {
        path: path.to_path_buf(),
        reason: format!("failed to render config: {e}"),
    })?;
    atomic_write(path, contents.as_bytes())
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<(), ConfigError> {
    let dir = path.parent().ok_or_else(|| ConfigError::Write {
        path: path.to_path_buf(),
        reason: "config path missing parent directory".to_string(),
    })?;
    let temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| ConfigError::Write {
        path: path.to_path_buf(),
        reason: format!("failed to create temp file in {}: {e}", dir.display()),
    })?;
    fs::write(temp.path(), data).map_err(|e| ConfigError::Write {
        path: path.to_path_buf(),
        reason: format!("failed to write config temp file: {e}"),
    })?;
    temp.persist(path).map_err(|e| ConfigError::Write {
        path: path.to_path_buf(),
        reason: format!("failed to persist config: {e}"),
    })?;
    Ok(())
}
