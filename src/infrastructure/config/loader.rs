use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::models::config::{Config, StoreBackend};

/// Project-local directory holding config and the default stores.
pub const CONFIG_DIR: &str = ".crafter";

/// Prefix for environment overrides, e.g. `CRAFTER_ENGINE__MAX_CONCURRENCY`.
pub const ENV_PREFIX: &str = "CRAFTER_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid max_concurrency: {0}. Must be between 1 and 1024")]
    InvalidMaxConcurrency(usize),

    #[error("Invalid pair_timeout_secs: {0}. Must be at least 1")]
    InvalidPairTimeout(u64),

    #[error("Invalid default_count: {0}. Must be at least 1")]
    InvalidDefaultCount(usize),

    #[error("Invalid max_rounds: {0}. Must be at least 1 when set")]
    InvalidMaxRounds(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Store path cannot be empty for the {0} backend")]
    EmptyStorePath(&'static str),

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid fetcher base_url: {0}. Must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration relative to the current directory.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .crafter/config.yaml (project config, created by init)
    /// 3. .crafter/local.yaml (local overrides, optional)
    /// 4. Environment variables (CRAFTER_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        Self::load_from_root(".")
    }

    /// Same hierarchy as [`Self::load`], rooted at `root` instead of the
    /// current directory.
    pub fn load_from_root(root: impl AsRef<Path>) -> Result<Config> {
        let dir = root.as_ref().join(CONFIG_DIR);
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file. Environment overrides
    /// still apply on top.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context(format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Explicit file when given, the project hierarchy otherwise.
    pub fn resolve(explicit: Option<&Path>) -> Result<Config> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    /// Path of the project config file under `root`.
    pub fn project_config_path(root: impl AsRef<Path>) -> PathBuf {
        root.as_ref().join(CONFIG_DIR).join("config.yaml")
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let engine = &config.engine;
        if engine.max_concurrency == 0 || engine.max_concurrency > 1024 {
            return Err(ConfigError::InvalidMaxConcurrency(engine.max_concurrency));
        }
        if engine.pair_timeout_secs == 0 {
            return Err(ConfigError::InvalidPairTimeout(engine.pair_timeout_secs));
        }
        if engine.default_count == 0 {
            return Err(ConfigError::InvalidDefaultCount(engine.default_count));
        }
        if let Some(0) = engine.max_rounds {
            return Err(ConfigError::InvalidMaxRounds(0));
        }

        match config.store.backend {
            StoreBackend::Sqlite if config.store.sqlite_path.trim().is_empty() => {
                return Err(ConfigError::EmptyStorePath("sqlite"));
            }
            StoreBackend::Json if config.store.json_path.trim().is_empty() => {
                return Err(ConfigError::EmptyStorePath("json"));
            }
            _ => {}
        }
        if config.store.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(config.store.max_connections));
        }

        let base_url = &config.fetcher.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url.clone()));
        }
        if config.fetcher.timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "fetcher timeout_secs must be at least 1".to_string(),
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::SamplingStrategy;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert_eq!(config.store.sqlite_path, ".crafter/elements.sqlite3");
        assert_eq!(config.engine.max_concurrency, 16);
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
store:
  backend: json
  json_path: /tmp/elements.json
engine:
  max_concurrency: 4
  max_rounds: 3
  rescan_all_known: true
sampling:
  strategy: ordered
  seed: 42
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.store.backend, StoreBackend::Json);
        assert_eq!(config.store.json_path, "/tmp/elements.json");
        assert_eq!(config.engine.max_concurrency, 4);
        assert_eq!(config.engine.max_rounds, Some(3));
        assert!(config.engine.rescan_all_known);
        assert_eq!(config.engine.pair_timeout_secs, 15, "unset fields keep defaults");
        assert_eq!(config.sampling.strategy, SamplingStrategy::Ordered);
        assert_eq!(config.sampling.seed, Some(42));
        assert_eq!(config.logging.format, "json");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_zero_concurrency() {
        let mut config = Config::default();
        config.engine.max_concurrency = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxConcurrency(0))
        ));
    }

    #[test]
    fn test_validate_zero_max_rounds() {
        let mut config = Config::default();
        config.engine.max_rounds = Some(0);
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxRounds(0))
        ));
    }

    #[test]
    fn test_validate_empty_store_path_for_active_backend() {
        let mut config = Config::default();
        config.store.json_path = String::new();
        assert!(ConfigLoader::validate(&config).is_ok(), "inactive backend path is ignored");

        config.store.backend = StoreBackend::Json;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyStorePath("json"))
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        match ConfigLoader::validate(&config) {
            Err(ConfigError::InvalidLogLevel(level)) => assert_eq!(level, "loud"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_bad_base_url() {
        let mut config = Config::default();
        config.fetcher.base_url = "neal.fun/api".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_hierarchical_merging() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("config.yaml"),
            "engine:\n  max_concurrency: 8\nlogging:\n  level: info\n  format: json\n",
        )
        .unwrap();
        std::fs::write(dir.join("local.yaml"), "logging:\n  level: debug\n").unwrap();

        let config = temp_env::with_vars_unset(
            ["CRAFTER_ENGINE__MAX_CONCURRENCY", "CRAFTER_LOGGING__LEVEL"],
            || ConfigLoader::load_from_root(root.path()),
        )
        .unwrap();

        assert_eq!(config.engine.max_concurrency, 8);
        assert_eq!(config.logging.level, "debug", "local.yaml should win");
        assert_eq!(config.logging.format, "json", "base value should persist");
    }

    #[test]
    fn test_env_override_wins() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.yaml"), "engine:\n  max_concurrency: 8\n").unwrap();

        let config = temp_env::with_vars(
            [
                ("CRAFTER_ENGINE__MAX_CONCURRENCY", Some("2")),
                ("CRAFTER_STORE__BACKEND", Some("json")),
            ],
            || ConfigLoader::load_from_root(root.path()),
        )
        .unwrap();

        assert_eq!(config.engine.max_concurrency, 2);
        assert_eq!(config.store.backend, StoreBackend::Json);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "fetcher:\n  timeout_secs: 3").unwrap();
        file.flush().unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.fetcher.timeout_secs, 3);
        assert!(ConfigLoader::load_from_file("/nonexistent/crafter.yaml").is_err());
    }

    #[test]
    fn test_invalid_file_value_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "logging:\n  format: xml").unwrap();
        file.flush().unwrap();

        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("xml"));
    }
}
