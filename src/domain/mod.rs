//! Domain layer for the crafter exploration engine
//!
//! This module contains the element model, the crafting modes and the port
//! traits that storage and transport adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
