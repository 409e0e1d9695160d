use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Override for the data directory (save store, revisions, logs).
    pub data_dir: Option<PathBuf>,
    /// Deploy/assets root the fetcher reads updates and language packs from.
    pub assets_dir: Option<PathBuf>,
    pub autosave: AutosaveSection,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            assets_dir: None,
            autosave: AutosaveSection::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveSection {
    /// Hard off-switch for the loop, regardless of the save document's flag.
    pub disabled: bool,
    pub save_every_secs: u64,
    pub snapshot_every_secs: u64,
    pub keep: usize,
}

impl Default for AutosaveSection {
    fn default() -> Self {
        Self {
            disabled: false,
            save_every_secs: 30,
            snapshot_every_secs: 10,
            keep: crate::store::DEFAULT_KEEP,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogRotation {
    Daily,
    Hourly,
    Minutely,
    Never,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub stdout: bool,
    pub stdout_format: LogFormat,
    pub filter: Option<String>,
    pub file: FileLoggingConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stdout: true,
            stdout_format: LogFormat::Compact,
            filter: None,
            file: FileLoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub enabled: bool,
    pub dir: Option<PathBuf>,
    pub format: LogFormat,
    pub rotation: LogRotation,
    pub retention_max_age_days: Option<u64>,
    pub retention_max_files: Option<usize>,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: None,
            format: LogFormat::Json,
            rotation: LogRotation::Daily,
            retention_max_age_days: Some(7),
            retention_max_files: Some(14),
        }
    }
}

/// One configuration layer (user file or site file); every field optional,
/// applied over the accumulated config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    pub data_dir: Option<PathBuf>,
    pub assets_dir: Option<PathBuf>,
    pub autosave: AutosaveSectionOverride,
    pub logging: LoggingOverride,
}

impl ConfigLayer {
    pub fn apply_to(&self, target: &mut Config) {
        if self.data_dir.is_some() {
            target.data_dir = self.data_dir.clone();
        }
        if self.assets_dir.is_some() {
            target.assets_dir = self.assets_dir.clone();
        }
        self.autosave.apply_to(&mut target.autosave);
        self.logging.apply_to(&mut target.logging);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveSectionOverride {
    pub disabled: Option<bool>,
    pub save_every_secs: Option<u64>,
    pub snapshot_every_secs: Option<u64>,
    pub keep: Option<usize>,
}

impl AutosaveSectionOverride {
    pub fn apply_to(&self, target: &mut AutosaveSection) {
        if let Some(disabled) = self.disabled {
            target.disabled = disabled;
        }
        if let Some(secs) = self.save_every_secs {
            target.save_every_secs = secs;
        }
        if let Some(secs) = self.snapshot_every_secs {
            target.snapshot_every_secs = secs;
        }
        if let Some(keep) = self.keep {
            target.keep = keep;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOverride {
    pub stdout: Option<bool>,
    pub stdout_format: Option<LogFormat>,
    pub filter: Option<String>,
    pub file: FileLoggingOverride,
}

impl LoggingOverride {
    pub fn apply_to(&self, target: &mut LoggingConfig) {
        if let Some(stdout) = self.stdout {
            target.stdout = stdout;
        }
        if let Some(format) = self.stdout_format {
            target.stdout_format = format;
        }
        if self.filter.is_some() {
            target.filter = self.filter.clone();
        }
        self.file.apply_to(&mut target.file);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingOverride {
    pub enabled: Option<bool>,
    pub dir: Option<PathBuf>,
    pub format: Option<LogFormat>,
    pub rotation: Option<LogRotation>,
    pub retention_max_age_days: Option<u64>,
    pub retention_max_files: Option<usize>,
}

impl FileLoggingOverride {
    pub fn apply_to(&self, target: &mut FileLoggingConfig) {
        if let Some(enabled) = self.enabled {
            target.enabled = enabled;
        }
        if self.dir.is_some() {
            target.dir = self.dir.clone();
        }
        if let Some(format) = self.format {
            target.format = format;
        }
        if let Some(rotation) = self.rotation {
            target.rotation = rotation;
        }
        if let Some(days) = self.retention_max_age_days {
            target.retention_max_age_days = Some(days);
        }
        if let Some(files) = self.retention_max_files {
            target.retention_max_files = Some(files);
        }
    }
}
