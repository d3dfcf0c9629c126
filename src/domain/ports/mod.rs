//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces that infrastructure adapters must implement:
//! - ElementStore: durable known-element persistence
//! - Fetcher: remote pair resolution
//! - ElementSampler: selection policy for the random modes

pub mod element_store;
pub mod fetcher;
pub mod sampler;

pub use element_store::ElementStore;
pub use fetcher::Fetcher;
pub use sampler::ElementSampler;
