//! Opening the element database described by a [`StoreConfig`].

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::domain::models::StoreConfig;

/// `sqlite_path` value that selects a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

const BUSY_TIMEOUT: Duration = Duration::from_secs(30);
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

/// Failures while opening the element database.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("SQLite store path is empty")]
    EmptyPath,
    #[error("Failed to create store directory {}: {source}", path.display())]
    StoreDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to open element database: {0}")]
    Open(#[source] sqlx::Error),
}

/// Where the configured element database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    InMemory,
    File(PathBuf),
}

impl StoreLocation {
    /// Read the location from `sqlite_path`. A leading `sqlite:` or
    /// `sqlite://` is accepted so connection strings work as paths.
    pub fn from_config(config: &StoreConfig) -> Result<Self, ConnectionError> {
        let raw = config.sqlite_path.trim();
        let path = raw
            .strip_prefix("sqlite://")
            .or_else(|| raw.strip_prefix("sqlite:"))
            .unwrap_or(raw);

        match path {
            "" => Err(ConnectionError::EmptyPath),
            IN_MEMORY_PATH => Ok(Self::InMemory),
            file => Ok(Self::File(PathBuf::from(file))),
        }
    }
}

/// Open a pool over the configured database file, creating the file and
/// any missing parent directories. `max_connections` comes from the config.
pub async fn open_pool(config: &StoreConfig) -> Result<SqlitePool, ConnectionError> {
    let path = match StoreLocation::from_config(config)? {
        StoreLocation::InMemory => return open_in_memory().await,
        StoreLocation::File(path) => path,
    };
    create_store_directory(&path)?;

    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(BUSY_TIMEOUT);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(options)
        .await
        .map_err(ConnectionError::Open)
}

/// Single-connection in-memory database. Every connection to `:memory:`
/// sees its own database, so the pool never grows past one.
pub async fn open_in_memory() -> Result<SqlitePool, ConnectionError> {
    let options = "sqlite::memory:"
        .parse::<SqliteConnectOptions>()
        .map_err(ConnectionError::Open)?
        .synchronous(SqliteSynchronous::Normal);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(ConnectionError::Open)
}

fn create_store_directory(path: &Path) -> Result<(), ConnectionError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| ConnectionError::StoreDirectory {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
