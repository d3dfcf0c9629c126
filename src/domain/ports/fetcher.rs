//! Fetcher port for the remote combination service.

use async_trait::async_trait;

use crate::domain::models::{Element, Pair};

/// Resolves a pair of elements into the element they combine into.
///
/// Resolution never fails from the caller's point of view: transport errors,
/// non-success responses and malformed payloads all come back as
/// [`Element::error`]. Implementations are shared across the concurrent
/// tasks of a round and must be safe to call from many of them at once.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetcher name (e.g., "http", "mock").
    fn name(&self) -> &'static str;

    /// Look up the result of combining the two elements of `pair`.
    async fn resolve(&self, pair: &Pair) -> Element;
}
