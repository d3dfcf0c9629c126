//! Round dispatcher: resolves a batch of pairs concurrently.
//!
//! One task per pair, bounded by a semaphore. Every task is joined before
//! the round is returned, so callers never observe a partial round. Each
//! lookup has its own deadline; an expired or panicked lookup becomes the
//! error sentinel. Cancelling the token aborts whatever is still in flight
//! and the round is reported as cancelled instead of returned.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Element, EngineConfig, Pair};
use crate::domain::ports::Fetcher;

/// Configuration for the round dispatcher.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Maximum lookups in flight at once.
    pub max_concurrency: usize,
    /// Deadline for a single lookup.
    pub pair_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 16,
            pair_timeout: Duration::from_secs(15),
        }
    }
}

impl From<&EngineConfig> for DispatcherConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            max_concurrency: config.max_concurrency.max(1),
            pair_timeout: Duration::from_secs(config.pair_timeout_secs),
        }
    }
}

/// Results of one fully joined round, in no particular order.
#[derive(Debug, Clone, Default)]
pub struct RoundResults {
    pub results: Vec<(Pair, Element)>,
}

impl RoundResults {
    /// Slots that came back as the error sentinel.
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|(_, e)| e.is_error()).count()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn into_elements(self) -> impl Iterator<Item = Element> {
        self.results.into_iter().map(|(_, e)| e)
    }
}

/// Fans a round's pairs out to the fetcher and joins them.
pub struct RoundDispatcher {
    fetcher: Arc<dyn Fetcher>,
    config: DispatcherConfig,
    cancel: CancellationToken,
    span: Span,
}

impl RoundDispatcher {
    /// Dispatcher with its own cancellation token.
    pub fn new(fetcher: Arc<dyn Fetcher>, config: DispatcherConfig) -> Self {
        let span = tracing::info_span!("round_dispatcher", fetcher = fetcher.name());
        Self {
            fetcher,
            config,
            cancel: CancellationToken::new(),
            span,
        }
    }

    /// Use an externally owned cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Replace the span this dispatcher logs under.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Token that aborts in-flight rounds when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Resolve every pair and wait for all of them.
    pub async fn dispatch(&self, round: usize, pairs: &BTreeSet<Pair>) -> DomainResult<RoundResults> {
        let span = tracing::info_span!(parent: &self.span, "round", round, pairs = pairs.len());
        self.dispatch_inner(round, pairs).instrument(span).await
    }

    async fn dispatch_inner(&self, round: usize, pairs: &BTreeSet<Pair>) -> DomainResult<RoundResults> {
        if self.cancel.is_cancelled() {
            return Err(DomainError::Cancelled { round });
        }

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let mut handles = Vec::with_capacity(pairs.len());

        for pair in pairs {
            let semaphore = semaphore.clone();
            let fetcher = self.fetcher.clone();
            let pair_timeout = self.config.pair_timeout;
            let pair = pair.clone();

            let handle = tokio::spawn(
                async move {
                    let Ok(_permit) = semaphore.acquire_owned().await else {
                        return Element::error();
                    };
                    match timeout(pair_timeout, fetcher.resolve(&pair)).await {
                        Ok(element) => element,
                        Err(_) => {
                            tracing::warn!(pair = %pair.key(), timeout_ms = pair_timeout.as_millis(), "lookup timed out");
                            Element::error()
                        }
                    }
                }
                .in_current_span(),
            );
            handles.push(handle);
        }

        let abort_handles: Vec<_> = handles.iter().map(tokio::task::JoinHandle::abort_handle).collect();

        let joined = tokio::select! {
            biased;
            () = self.cancel.cancelled() => None,
            joined = futures::future::join_all(handles) => Some(joined),
        };

        let Some(joined) = joined else {
            for handle in abort_handles {
                handle.abort();
            }
            tracing::warn!(round, "round cancelled, dropping in-flight lookups");
            return Err(DomainError::Cancelled { round });
        };

        let results: Vec<(Pair, Element)> = pairs
            .iter()
            .cloned()
            .zip(joined)
            .map(|(pair, outcome)| {
                let element = outcome.unwrap_or_else(|e| {
                    tracing::error!(pair = %pair.key(), error = %e, "lookup task failed");
                    Element::error()
                });
                (pair, element)
            })
            .collect();

        let round_results = RoundResults { results };
        tracing::debug!(round, resolved = round_results.len(), failed = round_results.failed(), "round joined");
        Ok(round_results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fetchers::MockFetcher;

    fn el(name: &str) -> Element {
        Element::new(name, "", false).unwrap()
    }

    fn base_pairs() -> BTreeSet<Pair> {
        crate::services::selection::pairs_with_base(&[el("Water")], &Element::base_set())
    }

    #[tokio::test]
    async fn test_dispatch_resolves_every_pair() {
        let fetcher = Arc::new(MockFetcher::new().with_result(&el("Water"), &el("Fire"), el("Steam")));
        let dispatcher = RoundDispatcher::new(fetcher.clone(), DispatcherConfig::default());

        let pairs = base_pairs();
        let round = dispatcher.dispatch(1, &pairs).await.unwrap();

        assert_eq!(round.len(), pairs.len());
        assert_eq!(round.failed(), pairs.len() - 1);
        assert_eq!(fetcher.call_count(), pairs.len());
        let steam: Vec<_> = round.into_elements().filter(|e| !e.is_error()).collect();
        assert_eq!(steam, vec![el("Steam")]);
    }

    #[tokio::test]
    async fn test_timeout_degrades_to_error_sentinel() {
        let fetcher = Arc::new(
            MockFetcher::with_default_response(el("Slow"))
                .with_delay(Duration::from_millis(200)),
        );
        let config = DispatcherConfig {
            max_concurrency: 4,
            pair_timeout: Duration::from_millis(10),
        };
        let dispatcher = RoundDispatcher::new(fetcher, config);

        let round = dispatcher.dispatch(1, &base_pairs()).await.unwrap();
        assert_eq!(round.failed(), round.len());
    }

    #[tokio::test]
    async fn test_cancellation_aborts_round() {
        let fetcher = Arc::new(MockFetcher::new().with_delay(Duration::from_secs(30)));
        let dispatcher = RoundDispatcher::new(fetcher, DispatcherConfig::default());
        let token = dispatcher.cancellation_token();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let result = dispatcher.dispatch(2, &base_pairs()).await;
        assert!(matches!(result, Err(DomainError::Cancelled { round: 2 })));
    }

    #[tokio::test]
    async fn test_already_cancelled_dispatches_nothing() {
        let fetcher = Arc::new(MockFetcher::new());
        let token = CancellationToken::new();
        token.cancel();
        let dispatcher = RoundDispatcher::new(fetcher.clone(), DispatcherConfig::default())
            .with_cancellation(token);

        assert!(dispatcher.dispatch(1, &base_pairs()).await.is_err());
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_round() {
        let dispatcher = RoundDispatcher::new(Arc::new(MockFetcher::new()), DispatcherConfig::default());
        let round = dispatcher.dispatch(1, &BTreeSet::new()).await.unwrap();
        assert!(round.is_empty());
    }
}
