//! Infrastructure adapters for external systems.

pub mod fetchers;
pub mod json_file;
pub mod sqlite;
