//! Repository port for the durable known-element set.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::Element;

/// Durable backing for discovered elements.
///
/// Implementations must tolerate repeated `persist` calls with overlapping
/// elements: persisting is an upsert keyed by element name.
#[async_trait]
pub trait ElementStore: Send + Sync {
    /// Short backend identifier (e.g. "sqlite", "json").
    fn backend_name(&self) -> &'static str;

    /// Load every previously persisted element.
    async fn load(&self) -> DomainResult<Vec<Element>>;

    /// Upsert the given elements by name.
    async fn persist(&self, elements: &[Element]) -> DomainResult<()>;
}
