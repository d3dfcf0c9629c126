pub mod config;
pub mod craft;
pub mod element;
pub mod pair;

pub use config::{
    Config, EngineConfig, FetcherConfig, LoggingConfig, SamplingConfig, SamplingStrategy,
    StoreBackend, StoreConfig,
};
pub use craft::{CraftMode, CraftOptions, CraftReport, RoundReport, DEFAULT_SAMPLE_COUNT};
pub use element::{Element, KnownElements, ERROR_ELEMENT_NAME, NOTHING_ELEMENT_NAME};
pub use pair::Pair;
