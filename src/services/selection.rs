//! Pair selection: samplers and the pair builders for each crafting mode.
//!
//! Builders are pure functions over element slices and always return a
//! `BTreeSet<Pair>`, so symmetric duplicates collapse and dispatch order is
//! deterministic for a given input.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeSet;
use std::sync::Mutex;

use crate::domain::models::{Element, Pair, SamplingConfig, SamplingStrategy};
use crate::domain::ports::ElementSampler;

/// Uniform random sampling without replacement.
pub struct RandomSampler {
    rng: Mutex<SmallRng>,
}

impl RandomSampler {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }

    /// Reproducible sampler for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }
}

impl ElementSampler for RandomSampler {
    fn name(&self) -> &'static str {
        "random"
    }

    fn sample(&self, pool: &[Element], count: usize) -> Vec<Element> {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        pool.choose_multiple(&mut *rng, count.min(pool.len()))
            .cloned()
            .collect()
    }
}

/// Takes the first `count` elements in name order.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderedSampler;

impl ElementSampler for OrderedSampler {
    fn name(&self) -> &'static str {
        "ordered"
    }

    fn sample(&self, pool: &[Element], count: usize) -> Vec<Element> {
        let mut sorted: Vec<&Element> = pool.iter().collect();
        sorted.sort();
        sorted.into_iter().take(count).cloned().collect()
    }
}

/// Build the sampler described by the configuration.
pub fn sampler_from_config(config: &SamplingConfig) -> Box<dyn ElementSampler> {
    match (config.strategy, config.seed) {
        (SamplingStrategy::Ordered, _) => Box::new(OrderedSampler),
        (SamplingStrategy::Random, Some(seed)) => Box::new(RandomSampler::seeded(seed)),
        (SamplingStrategy::Random, None) => Box::new(RandomSampler::from_entropy()),
    }
}

/// Every operand paired with every base element.
pub fn pairs_with_base<'a, I>(operands: I, base: &[Element]) -> BTreeSet<Pair>
where
    I: IntoIterator<Item = &'a Element>,
{
    operands
        .into_iter()
        .flat_map(|element| {
            base.iter()
                .map(move |b| Pair::new(element.clone(), b.clone()))
        })
        .collect()
}

/// Disjoint pairs drawn from `sample` two at a time, at most `max_pairs`.
///
/// The sample is consumed front to back, so no element lands in two pairs.
/// An odd leftover element is dropped.
pub fn disjoint_pairs(sample: &[Element], max_pairs: usize) -> BTreeSet<Pair> {
    sample
        .chunks_exact(2)
        .take(max_pairs)
        .map(|chunk| Pair::new(chunk[0].clone(), chunk[1].clone()))
        .collect()
}

/// One fixed element paired with each of `partners`.
pub fn pairs_with_anchor(anchor: &Element, partners: &[Element]) -> BTreeSet<Pair> {
    partners
        .iter()
        .map(|p| Pair::new(anchor.clone(), p.clone()))
        .collect()
}
