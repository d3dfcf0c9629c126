//! Sampling port used by the random crafting modes.

use crate::domain::models::Element;

/// Chooses up to `count` distinct elements from a pool.
///
/// The pool is already deduplicated by name. Implementations return
/// `min(count, pool.len())` elements and never repeat one.
pub trait ElementSampler: Send + Sync {
    /// Sampler name (e.g., "random", "ordered").
    fn name(&self) -> &'static str;

    fn sample(&self, pool: &[Element], count: usize) -> Vec<Element>;
}
