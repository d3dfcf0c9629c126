//! CLI command implementations.

pub mod craft;
pub mod export;
pub mod init;
pub mod list;
