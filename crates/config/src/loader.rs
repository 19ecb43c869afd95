use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::WagateConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["wagate.toml", "wagate.yaml", "wagate.yml", "wagate.json"];

/// Override for the config directory, set via `set_config_dir()`.
static CONFIG_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Set a custom config directory. When set, config discovery only looks in
/// this directory (project-local and user-global paths are skipped). Used by
/// tests to isolate from the host environment.
pub fn set_config_dir(path: PathBuf) {
    *lock_override() = Some(path);
}

/// Clear the config directory override, restoring default discovery.
pub fn clear_config_dir() {
    *lock_override() = None;
}

fn lock_override() -> std::sync::MutexGuard<'static, Option<PathBuf>> {
    // Recover from poisoning; the override is a plain PathBuf either way.
    CONFIG_DIR_OVERRIDE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<WagateConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);

    match path.extension().and_then(|e| e.to_str()).unwrap_or("toml") {
        "toml" => Ok(toml::from_str(&raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(&raw)?),
        "json" => Ok(serde_json::from_str(&raw)?),
        other => anyhow::bail!("unsupported config format: .{other}"),
    }
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./wagate.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/wagate/wagate.{toml,yaml,yml,json}` (user-global)
///
/// When no file exists, a default TOML config is written to the user-global
/// path and `WagateConfig::default()` is returned.
pub fn discover_and_load() -> WagateConfig {
    let Some(path) = find_config_file() else {
        debug!("no config file found, writing default config");
        let config = WagateConfig::default();
        if let Err(e) = write_default_config(&config) {
            warn!(error = %e, "failed to write default config file");
        }
        return config;
    };

    debug!(path = %path.display(), "loading config");
    match load_config(&path) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            WagateConfig::default()
        },
    }
}

/// Find the first config file in standard locations.
///
/// When a config dir override is set, only that directory is searched.
fn find_config_file() -> Option<PathBuf> {
    if let Some(dir) = lock_override().clone() {
        return CONFIG_FILENAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists());
    }

    // Project-local first.
    if let Some(p) = CONFIG_FILENAMES
        .iter()
        .map(|name| PathBuf::from(*name))
        .find(|p| p.exists())
    {
        return Some(p);
    }

    // User-global.
    let dir = user_config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the config directory: override, or `~/.config/wagate/`.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(dir) = lock_override().clone() {
        return Some(dir);
    }
    user_config_dir()
}

/// Returns the data directory (session store, downloads): `~/.wagate/`.
pub fn data_dir() -> PathBuf {
    home_dir()
        .map(|h| h.join(".wagate"))
        .unwrap_or_else(|| PathBuf::from(".wagate"))
}

fn user_config_dir() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".config").join("wagate"))
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}

/// Write the default config file. Only called when no config file exists yet.
fn write_default_config(config: &WagateConfig) -> anyhow::Result<()> {
    let Some(dir) = config_dir() else {
        anyhow::bail!("could not resolve a config directory");
    };
    let path = dir.join(CONFIG_FILENAMES[0]);
    if path.exists() {
        return Ok(());
    }
    std::fs::create_dir_all(&dir)?;
    let toml_str =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("serialize config: {e}"))?;
    std::fs::write(&path, toml_str)?;
    debug!(path = %path.display(), "wrote default config file");
    Ok(())
}

#[cfg(test)]
// set_var is unsafe in edition 2024; confined to test setup here.
#[allow(unsafe_code)]
mod tests {
    use super::*;

    // Tests share the process-wide override; serialize them with a lock.
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    fn lock_test() -> std::sync::MutexGuard<'static, ()> {
        TEST_LOCK.lock().unwrap_or_else(|p| p.into_inner())
    }

    #[test]
    fn loads_toml_from_override_dir() {
        let _guard = lock_test();
        let dir = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("tempdir: {e}"),
        };
        let path = dir.path().join("wagate.toml");
        if let Err(e) = std::fs::write(&path, "[gateway]\nport = 9999\nbind = \"127.0.0.1\"\n") {
            panic!("write config: {e}");
        }

        set_config_dir(dir.path().to_path_buf());
        let config = discover_and_load();
        clear_config_dir();

        assert_eq!(config.gateway.port, 9999);
        assert_eq!(config.gateway.bind, "127.0.0.1");
    }

    #[test]
    fn env_substitution_applies_to_values() {
        let _guard = lock_test();
        let dir = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("tempdir: {e}"),
        };
        unsafe { std::env::set_var("WAGATE_TEST_BIND", "10.0.0.5") };
        let path = dir.path().join("wagate.toml");
        if let Err(e) = std::fs::write(&path, "[gateway]\nbind = \"${WAGATE_TEST_BIND}\"\n") {
            panic!("write config: {e}");
        }

        set_config_dir(dir.path().to_path_buf());
        let config = discover_and_load();
        clear_config_dir();
        unsafe { std::env::remove_var("WAGATE_TEST_BIND") };

        assert_eq!(config.gateway.bind, "10.0.0.5");
    }

    #[test]
    fn writes_default_config_when_missing() {
        let _guard = lock_test();
        let dir = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("tempdir: {e}"),
        };

        set_config_dir(dir.path().to_path_buf());
        let config = discover_and_load();
        let written = dir.path().join("wagate.toml").exists();
        clear_config_dir();

        assert_eq!(config.gateway.port, 3001);
        assert!(written, "default config file should be created");
    }

    #[test]
    fn malformed_config_falls_back_to_defaults() {
        let _guard = lock_test();
        let dir = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("tempdir: {e}"),
        };
        let path = dir.path().join("wagate.toml");
        if let Err(e) = std::fs::write(&path, "this is not toml = = =") {
            panic!("write config: {e}");
        }

        set_config_dir(dir.path().to_path_buf());
        let config = discover_and_load();
        clear_config_dir();

        assert_eq!(config.gateway.port, 3001);
    }
}
