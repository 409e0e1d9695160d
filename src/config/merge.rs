use std::path::PathBuf;

use super::{Config, ConfigLayer};

/// User layer first, then the site layer on top.
pub fn merge_layers(user: Option<ConfigLayer>, site: Option<ConfigLayer>) -> Config {
    let mut config = Config::default();
    if let Some(layer) = user {
        layer.apply_to(&mut config);
    }
    if let Some(layer) = site {
        layer.apply_to(&mut config);
    }
    config
}

pub fn apply_env_overrides(config: &mut Config) {
    if std::env::var("GC_NO_AUTOSAVE").is_ok() {
        config.autosave.disabled = true;
    }

    if let Ok(raw) = std::env::var("GC_DATA_DIR") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            config.data_dir = Some(PathBuf::from(trimmed));
        }
    }

    if let Ok(raw) = std::env::var("GC_ASSETS_DIR") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            config.assets_dir = Some(PathBuf::from(trimmed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Mutex, MutexGuard, OnceLock};

    fn env_lock() -> MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .expect("env lock")
    }

    struct EnvGuard {
        _lock: MutexGuard<'static, ()>,
        prev: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new(vars: &[(&str, &str)]) -> Self {
            let lock = env_lock();
            let mut prev = Vec::with_capacity(vars.len());
            for (key, value) in vars {
                let key_string = (*key).to_string();
                let prior = std::env::var(key).ok();
                prev.push((key_string.clone(), prior));
                std::env::set_var(key, value);
            }
            Self { _lock: lock, prev }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in self.prev.drain(..) {
                match value {
                    Some(val) => std::env::set_var(&key, val),
                    None => std::env::remove_var(&key),
                }
            }
        }
    }

    #[test]
    fn merge_layers_respects_precedence() {
        let mut user = ConfigLayer::default();
        user.autosave.keep = Some(20);
        user.autosave.save_every_secs = Some(60);

        let mut site = ConfigLayer::default();
        site.autosave.keep = Some(5);

        let config = merge_layers(Some(user), Some(site));
        assert_eq!(config.autosave.keep, 5);
        assert_eq!(config.autosave.save_every_secs, 60);
    }

    #[test]
    fn env_overrides_apply() {
        let _guard = EnvGuard::new(&[
            ("GC_NO_AUTOSAVE", "1"),
            ("GC_DATA_DIR", "/tmp/gc-data"),
            ("GC_ASSETS_DIR", "/srv/grid"),
        ]);

        let mut config = Config::default();
        apply_env_overrides(&mut config);

        assert!(config.autosave.disabled);
        assert_eq!(config.data_dir.as_deref(), Some(std::path::Path::new("/tmp/gc-data")));
        assert_eq!(config.assets_dir.as_deref(), Some(std::path::Path::new("/srv/grid")));
    }
}
