//! HTTP fetcher adapter for the remote pair endpoint.
//!
//! One `GET {base_url}?first=A&second=B` per pair. The service answers with
//! `{"result": "...", "emoji": "...", "isNew": ...}`. Anything other than a
//! 200 with a well-formed payload is reported as the error sentinel.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL, REFERER};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tracing::{Instrument, Span};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Element, FetcherConfig, Pair};
use crate::domain::ports::Fetcher;

/// Why a single lookup was replaced by the error sentinel.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(StatusCode),

    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// reqwest-backed fetcher. The client pools connections and is shared by
/// every concurrent lookup of a round.
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
    span: Span,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> DomainResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(
            REFERER,
            HeaderValue::from_str(&config.referer)
                .map_err(|e| DomainError::InvalidOptions(format!("invalid referer: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| DomainError::InvalidOptions(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            span: tracing::info_span!("http_fetcher", base_url = %config.base_url),
        })
    }

    /// Replace the span this fetcher logs under.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    async fn fetch(&self, pair: &Pair) -> Result<Element, FetchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("first", pair.first().name()), ("second", pair.second().name())])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(url = %response.url(), %status, "GET");
        if status != StatusCode::OK {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        serde_json::from_str::<Element>(&body).map_err(|e| FetchError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn resolve(&self, pair: &Pair) -> Element {
        let span = self.span.clone();
        async {
            match self.fetch(pair).await {
                Ok(element) => {
                    tracing::info!(pair = %pair, result = %element, "combined");
                    element
                }
                Err(err) => {
                    tracing::warn!(pair = %pair.key(), error = %err, "lookup failed, using error sentinel");
                    Element::error()
                }
            }
        }
        .instrument(span)
        .await
    }
}
