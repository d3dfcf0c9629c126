//! SQLite database adapters for the crafter element store.

pub mod connection;
pub mod element_store;
pub mod migrations;

pub use connection::{open_in_memory, open_pool, ConnectionError, StoreLocation, IN_MEMORY_PATH};
pub use element_store::SqliteElementStore;
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};

use sqlx::SqlitePool;

use crate::domain::models::StoreConfig;

/// Opening or migrating the element database failed.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),
}

/// Open the configured element database and bring its schema up to date.
pub async fn initialize_database(config: &StoreConfig) -> Result<SqlitePool, DatabaseError> {
    migrated(open_pool(config).await?).await
}

/// In-memory element database with the schema applied.
pub async fn open_migrated_in_memory() -> Result<SqlitePool, DatabaseError> {
    migrated(open_in_memory().await?).await
}

async fn migrated(pool: SqlitePool) -> Result<SqlitePool, DatabaseError> {
    Migrator::new(pool.clone())
        .run_embedded_migrations(all_embedded_migrations())
        .await?;
    Ok(pool)
}
