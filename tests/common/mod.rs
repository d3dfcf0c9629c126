//! Common test utilities for integration tests
//!
//! Shared fixtures for building engines over real store adapters with a
//! scripted fetcher.

#![allow(dead_code)]

use std::sync::Arc;
use tempfile::TempDir;

use crafter::adapters::fetchers::MockFetcher;
use crafter::adapters::json_file::JsonFileStore;
use crafter::adapters::sqlite::{open_migrated_in_memory, SqliteElementStore};
use crafter::domain::ports::ElementStore;
use crafter::services::{CraftingEngine, DispatcherConfig, ElementCatalog, OrderedSampler, RoundDispatcher};
use crafter::{Element, EngineConfig};

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Element with an empty glyph
pub fn el(name: &str) -> Element {
    Element::new(name, "", false).expect("valid element name")
}

/// Base element by name, with its glyph
pub fn base(name: &str) -> Element {
    Element::base_set()
        .into_iter()
        .find(|e| e.name() == name)
        .expect("base element")
}

/// JSON store in a fresh temp dir; keep the dir alive for the test.
pub fn json_store() -> (TempDir, Arc<JsonFileStore>) {
    let dir = temp_dir();
    let store = Arc::new(JsonFileStore::new(dir.path().join("elements.json")));
    (dir, store)
}

/// SQLite store over an in-memory database with migrations applied.
pub async fn sqlite_store() -> Arc<SqliteElementStore> {
    let pool = open_migrated_in_memory().await.expect("Failed to create test pool");
    Arc::new(SqliteElementStore::new(pool))
}

/// Seed `store` with `names` and return a loaded engine using the ordered sampler.
pub async fn engine_over(
    store: Arc<dyn ElementStore>,
    names: &[&str],
    fetcher: Arc<MockFetcher>,
    config: EngineConfig,
) -> CraftingEngine {
    let seed: Vec<Element> = names.iter().map(|n| el(n)).collect();
    if !seed.is_empty() {
        store.persist(&seed).await.expect("seed store");
    }

    let dispatcher = RoundDispatcher::new(fetcher, DispatcherConfig::from(&config));
    let mut engine = CraftingEngine::new(
        ElementCatalog::new(store),
        dispatcher,
        Arc::new(OrderedSampler),
        config,
    );
    engine.load().await.expect("load known set");
    engine
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
