//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$MAILTHREAD_CONFIG` (environment variable)
//! 2. `~/.config/mailthread/config.toml` (Linux/macOS)
//!    `%APPDATA%\mailthread\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Where the local provider store lives.
    pub store: StoreConfig,
    /// Search defaults.
    pub search: SearchConfig,
    /// Transcript output defaults.
    pub output: OutputConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
}

/// Local provider store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding `threads/` and `attachments/`.
    pub path: Option<PathBuf>,
}

/// Search defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of threads returned by a search.
    pub max_results: usize,
}

/// Transcript output defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Show newest message first.
    pub reverse: bool,
    /// Strip quoted history from every message body.
    pub messages_only: bool,
    /// Default directory for downloaded attachments.
    pub attachment_dir: Option<PathBuf>,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { max_results: 25 }
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Load the configuration from [`config_file_path`], or defaults if there is none.
pub fn load_config() -> Config {
    config_file_path()
        .filter(|path| path.exists())
        .map(|path| load_config_from(&path))
        .unwrap_or_default()
}

/// Load a configuration file. Unreadable or malformed files log a warning
/// and yield the defaults.
pub fn load_config_from(path: &Path) -> Config {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|contents| toml::from_str::<Config>(&contents).map_err(|e| e.to_string()));

    match parsed {
        Ok(config) => {
            tracing::info!(path = %path.display(), "Loaded config");
            config
        }
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "Ignoring config file");
            Config::default()
        }
    }
}

/// Write `config` to [`config_file_path`]. Returns the path written.
pub fn save_config(config: &Config) -> anyhow::Result<PathBuf> {
    let Some(path) = config_file_path() else {
        anyhow::bail!("No configuration directory on this platform; set MAILTHREAD_CONFIG");
    };
    save_config_to(config, &path)?;
    Ok(path)
}

/// Write `config` as TOML to `path`, creating parent directories.
pub fn save_config_to(config: &Config, path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, toml::to_string_pretty(config)?)?;
    tracing::info!(path = %path.display(), "Saved config");
    Ok(())
}

/// `$MAILTHREAD_CONFIG` if set, else `<config dir>/mailthread/config.toml`.
pub fn config_file_path() -> Option<PathBuf> {
    match std::env::var_os("MAILTHREAD_CONFIG") {
        Some(path) => Some(PathBuf::from(path)),
        None => dirs::config_dir().map(|d| d.join("mailthread").join("config.toml")),
    }
}

/// Directory for the log file: `[general] cache_dir`, else the platform cache dir.
pub fn cache_dir(config: &Config) -> PathBuf {
    match &config.general.cache_dir {
        Some(dir) => dir.clone(),
        None => dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mailthread"),
    }
}

pub fn log_file_path(config: &Config) -> PathBuf {
    cache_dir(config).join("mailthread.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.general.log_level, "warn");
        assert_eq!(cfg.search.max_results, 25);
        assert!(!cfg.output.reverse);
        assert!(!cfg.output.messages_only);
        assert!(cfg.store.path.is_none());
    }

    #[test]
    fn test_save_then_load_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.search.max_results = 10;
        cfg.output.attachment_dir = Some(PathBuf::from("/tmp/attachments"));
        save_config_to(&cfg, &path).expect("save");

        let loaded = load_config_from(&path);
        assert_eq!(loaded.search.max_results, 10);
        assert_eq!(loaded.output.attachment_dir, cfg.output.attachment_dir);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[search]\nmax_results = \"many\"\n").expect("write");
        assert_eq!(load_config_from(&path).search.max_results, 25);
        assert_eq!(load_config_from(&tmp.path().join("missing.toml")).search.max_results, 25);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let partial = r#"
[output]
messages_only = true

[store]
path = "/var/mail/export"
"#;
        let cfg: Config = toml::from_str(partial).expect("parse partial");
        assert!(cfg.output.messages_only);
        assert_eq!(cfg.store.path, Some(PathBuf::from("/var/mail/export")));
        assert!(!cfg.output.reverse);
        assert_eq!(cfg.search.max_results, 25);
        assert_eq!(cfg.general.log_level, "warn");
    }

    #[test]
    fn test_log_file_inside_cache_dir() {
        let mut cfg = Config::default();
        cfg.general.cache_dir = Some(PathBuf::from("/tmp/mt-cache"));
        assert_eq!(
            log_file_path(&cfg),
            PathBuf::from("/tmp/mt-cache/mailthread.log")
        );
    }
}
