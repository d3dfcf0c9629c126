//! Wiring from configuration to adapters and services.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::adapters::fetchers::{HttpFetcher, MockFetcher};
use crate::adapters::json_file::JsonFileStore;
use crate::adapters::sqlite::{initialize_database, SqliteElementStore};
use crate::domain::models::{Config, Element, StoreBackend, StoreConfig};
use crate::domain::ports::{ElementStore, Fetcher};
use crate::services::{sampler_from_config, CraftingEngine, DispatcherConfig, ElementCatalog, RoundDispatcher};

/// Open the configured store, creating it (and running migrations) when
/// it does not exist yet.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn ElementStore>> {
    match config.backend {
        StoreBackend::Sqlite => {
            let pool = initialize_database(config)
                .await
                .with_context(|| format!("Failed to open SQLite store at {}", config.sqlite_path))?;
            Ok(Arc::new(SqliteElementStore::new(pool)))
        }
        StoreBackend::Json => Ok(Arc::new(JsonFileStore::new(&config.json_path))),
    }
}

/// Remote fetcher, or a mock answering `Nothing` for every pair.
pub fn build_fetcher(config: &Config, dry_run: bool) -> Result<Arc<dyn Fetcher>> {
    if dry_run {
        return Ok(Arc::new(MockFetcher::with_default_response(Element::nothing())));
    }
    let fetcher = HttpFetcher::new(&config.fetcher).context("Failed to build HTTP fetcher")?;
    Ok(Arc::new(fetcher))
}

/// Assemble a loaded engine. `cancel` aborts in-flight rounds.
pub async fn build_engine(
    config: &Config,
    dry_run: bool,
    cancel: CancellationToken,
) -> Result<CraftingEngine> {
    let store = open_store(&config.store).await?;
    let fetcher = build_fetcher(config, dry_run)?;

    let dispatcher = RoundDispatcher::new(fetcher, DispatcherConfig::from(&config.engine))
        .with_cancellation(cancel);
    let sampler = Arc::from(sampler_from_config(&config.sampling));

    let mut engine = CraftingEngine::new(
        ElementCatalog::new(store),
        dispatcher,
        sampler,
        config.engine.clone(),
    )
    .with_span(tracing::info_span!("crafting_engine", dry_run));
    engine.load().await.context("Failed to load known elements")?;
    Ok(engine)
}
