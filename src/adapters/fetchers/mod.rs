//! Fetcher adapter implementations.

pub mod http;
pub mod mock;

pub use http::{FetchError, HttpFetcher};
pub use mock::MockFetcher;
