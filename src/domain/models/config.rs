use serde::{Deserialize, Serialize};

/// Main configuration structure for crafter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Element store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Remote combination service configuration
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Engine tuning
    #[serde(default)]
    pub engine: EngineConfig,

    /// Sampling policy for the random modes
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which store adapter backs the known set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sqlite,
    Json,
}

/// Element store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,

    /// Path to `SQLite` database file
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,

    /// Path to the JSON document
    #[serde(default = "default_json_path")]
    pub json_path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

const fn default_backend() -> StoreBackend {
    StoreBackend::Sqlite
}

fn default_sqlite_path() -> String {
    ".crafter/elements.sqlite3".to_string()
}

fn default_json_path() -> String {
    ".crafter/elements.json".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            sqlite_path: default_sqlite_path(),
            json_path: default_json_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Remote combination service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FetcherConfig {
    /// Pair endpoint; receives `first` and `second` query parameters
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_referer")]
    pub referer: String,
}

fn default_base_url() -> String {
    "https://neal.fun/api/infinite-craft/pair".to_string()
}

const fn default_fetch_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36".to_string()
}

fn default_referer() -> String {
    "https://neal.fun/infinite-craft/".to_string()
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_fetch_timeout(),
            user_agent: default_user_agent(),
            referer: default_referer(),
        }
    }
}

/// Engine tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Maximum pairs in flight at once within a round
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Per-pair deadline; expiry yields the error sentinel
    #[serde(default = "default_pair_timeout")]
    pub pair_timeout_secs: u64,

    /// Sample size used when the caller gives none
    #[serde(default = "default_count")]
    pub default_count: usize,

    /// Optional cap on exhaustive rounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rounds: Option<usize>,

    /// Exhaustive mode: re-pair the whole known set each round instead of
    /// only the previous round's discoveries
    #[serde(default)]
    pub rescan_all_known: bool,

    /// Rounds larger than this many pairs are logged as a warning
    #[serde(default = "default_large_round_warning")]
    pub large_round_warning: usize,
}

const fn default_max_concurrency() -> usize {
    16
}

const fn default_pair_timeout() -> u64 {
    15
}

const fn default_count() -> usize {
    5
}

const fn default_large_round_warning() -> usize {
    2000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            pair_timeout_secs: default_pair_timeout(),
            default_count: default_count(),
            max_rounds: None,
            rescan_all_known: false,
            large_round_warning: default_large_round_warning(),
        }
    }
}

/// Sampling strategy for the random modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingStrategy {
    Random,
    Ordered,
}

/// Sampling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SamplingConfig {
    #[serde(default = "default_sampling_strategy")]
    pub strategy: SamplingStrategy,

    /// Fixed seed for reproducible random sampling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

const fn default_sampling_strategy() -> SamplingStrategy {
    SamplingStrategy::Random
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            strategy: default_sampling_strategy(),
            seed: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files (stderr only when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
