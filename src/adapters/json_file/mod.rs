//! Flat JSON document adapter for the element store.

pub mod element_store;

pub use element_store::JsonFileStore;
