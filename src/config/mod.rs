//! Config loading and persistence.

mod load;
mod merge;
mod schema;

pub use load::{
    config_path, load, load_or_init, load_site_config, load_user_config, site_config_path,
    write_config, ConfigError,
};
pub use merge::{apply_env_overrides, merge_layers};
pub use schema::{
    AutosaveSection, AutosaveSectionOverride, Config, ConfigLayer, FileLoggingConfig,
    FileLoggingOverride, LogFormat, LogRotation, LoggingConfig, LoggingOverride,
};
