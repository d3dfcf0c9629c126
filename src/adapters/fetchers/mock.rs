//! Mock fetcher for testing and dry runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

use crate::domain::models::{Element, Pair};
use crate::domain::ports::Fetcher;

/// Canned pair-to-result table with a fallback answer.
///
/// Lookups are order-insensitive because they go through [`Pair::key`].
pub struct MockFetcher {
    responses: RwLock<HashMap<String, Element>>,
    default_response: Element,
    delay: Option<Duration>,
    calls: AtomicUsize,
    resolved: RwLock<Vec<Pair>>,
}

impl MockFetcher {
    /// A fetcher that answers every pair with the error sentinel.
    pub fn new() -> Self {
        Self::with_default_response(Element::error())
    }

    pub fn with_default_response(response: Element) -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            default_response: response,
            delay: None,
            calls: AtomicUsize::new(0),
            resolved: RwLock::new(Vec::new()),
        }
    }

    /// Sleep before answering, to exercise timeouts and cancellation.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Builder form of [`Self::set_result`].
    #[must_use]
    pub fn with_result(mut self, a: &Element, b: &Element, result: Element) -> Self {
        let key = Pair::new(a.clone(), b.clone()).key();
        self.responses.get_mut().insert(key, result);
        self
    }

    /// Set the answer for one pair.
    pub async fn set_result(&self, a: &Element, b: &Element, result: Element) {
        let key = Pair::new(a.clone(), b.clone()).key();
        self.responses.write().await.insert(key, result);
    }

    /// Number of `resolve` calls that started.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Pairs that were answered, in completion order.
    pub async fn resolved_pairs(&self) -> Vec<Pair> {
        self.resolved.read().await.clone()
    }
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn resolve(&self, pair: &Pair) -> Element {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let result = self
            .responses
            .read()
            .await
            .get(&pair.key())
            .cloned()
            .unwrap_or_else(|| self.default_response.clone());

        self.resolved.write().await.push(pair.clone());
        result
    }
}
