//! Crafter - combination explorer for an element-crafting service
//!
//! Crafter queries a remote service that answers "what do A and B make?",
//! keeps a durable catalog of every element discovered so far, and can
//! sweep the catalog exhaustively or sample it at random.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): elements, pairs, modes, config, ports
//! - **Adapters** (`adapters`): SQLite and JSON stores, HTTP and mock fetchers
//! - **Service Layer** (`services`): catalog, pair selection, round dispatch, engine
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use crafter::adapters::{fetchers::MockFetcher, json_file::JsonFileStore};
//! use crafter::services::{CraftingEngine, DispatcherConfig, ElementCatalog, OrderedSampler, RoundDispatcher};
//! use crafter::{CraftMode, CraftOptions, EngineConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(JsonFileStore::new("elements.json"));
//!     let dispatcher = RoundDispatcher::new(Arc::new(MockFetcher::new()), DispatcherConfig::default());
//!     let mut engine = CraftingEngine::new(
//!         ElementCatalog::new(store),
//!         dispatcher,
//!         Arc::new(OrderedSampler),
//!         EngineConfig::default(),
//!     );
//!     engine.load().await?;
//!     let report = engine.run(CraftMode::ExhaustiveBase, &CraftOptions::default()).await?;
//!     println!("{} new", report.discovered_count());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Config, CraftMode, CraftOptions, CraftReport, Element, EngineConfig, FetcherConfig,
    KnownElements, LoggingConfig, Pair, RoundReport, SamplingConfig, StoreBackend, StoreConfig,
};
pub use domain::ports::{ElementSampler, ElementStore, Fetcher};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{CraftingEngine, ElementCatalog, RoundDispatcher};
