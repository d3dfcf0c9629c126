pub mod crafting_engine;
pub mod dispatcher;
pub mod element_catalog;
pub mod export;
pub mod selection;

pub use crafting_engine::{CraftingEngine, PairStrategy};
pub use dispatcher::{DispatcherConfig, RoundDispatcher, RoundResults};
pub use element_catalog::ElementCatalog;
pub use export::{export_elements, ExportFormat, CHROME_STORAGE_KEY};
pub use selection::{
    disjoint_pairs, pairs_with_anchor, pairs_with_base, sampler_from_config, OrderedSampler,
    RandomSampler,
};
