//! Element catalog: the in-memory known set in front of a durable store.
//!
//! Merging only stages elements; nothing reaches the known set until the
//! staged delta has been written through the store. A failed persist keeps
//! the delta staged so the caller can retry.

use std::sync::Arc;
use tracing::{Instrument, Span};

use crate::domain::errors::DomainResult;
use crate::domain::models::{Element, KnownElements};
use crate::domain::ports::ElementStore;

/// The known set and its pending delta, backed by an [`ElementStore`].
pub struct ElementCatalog {
    store: Arc<dyn ElementStore>,
    known: KnownElements,
    pending: KnownElements,
    span: Span,
}

impl ElementCatalog {
    /// Empty catalog; [`Self::load`] fills it from `store`.
    pub fn new(store: Arc<dyn ElementStore>) -> Self {
        let span = tracing::info_span!("element_catalog", backend = store.backend_name());
        Self {
            store,
            known: KnownElements::new(),
            pending: KnownElements::new(),
            span,
        }
    }

    /// Replace the span this catalog logs under.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Replace the known set with the store's contents. Returns the count.
    pub async fn load(&mut self) -> DomainResult<usize> {
        let elements = self.store.load().instrument(self.span.clone()).await?;

        self.known = elements.into_iter().filter(|e| !e.is_sentinel()).collect();
        self.pending.clear();

        let _enter = self.span.enter();
        tracing::info!(count = self.known.len(), "loaded known elements");
        Ok(self.known.len())
    }

    /// Stage results for persistence. Elements already known or already
    /// staged are ignored, as are sentinels. Returns the genuinely new ones.
    pub fn merge<I>(&mut self, results: I) -> Vec<Element>
    where
        I: IntoIterator<Item = Element>,
    {
        let _enter = self.span.enter();
        let mut fresh = Vec::new();
        for element in results {
            if element.is_sentinel() {
                continue;
            }
            if self.known.contains(element.name()) {
                tracing::debug!(element = %element, "already known");
                continue;
            }
            if self.pending.insert(element.clone()) {
                tracing::debug!(element = %element, "staging new element");
                fresh.push(element);
            }
        }
        fresh
    }

    /// Write the staged delta through the store and fold it into the known set.
    pub async fn persist(&mut self) -> DomainResult<usize> {
        if self.pending.is_empty() {
            return Ok(0);
        }

        let delta = self.pending.to_vec();
        self.store.persist(&delta).instrument(self.span.clone()).await?;

        let written = delta.len();
        self.known.extend(delta);
        self.pending.clear();

        let _enter = self.span.enter();
        tracing::info!(written, total = self.known.len(), "saved elements");
        Ok(written)
    }

    pub fn known(&self) -> &KnownElements {
        &self.known
    }

    /// Elements staged by `merge` but not yet persisted.
    pub fn pending(&self) -> &KnownElements {
        &self.pending
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}
