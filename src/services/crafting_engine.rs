//! Crafting engine: selects pairs, runs rounds and decides when to stop.
//!
//! A round is: build the pair set from the known set, dispatch it through
//! the [`RoundDispatcher`], merge the joined results into the
//! [`ElementCatalog`], and persist the newly discovered delta. Only the
//! exhaustive mode runs more than one round; it stops at the first round
//! that discovers nothing (or at `max_rounds`).
//!
//! Exhaustive cost per round is `|operands| x |base|` lookups. With
//! `rescan_all_known` the operands are the whole known set, which grows
//! every round, so long runs get expensive quickly.

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{Instrument, Span};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    CraftMode, CraftOptions, CraftReport, Element, EngineConfig, Pair, RoundReport,
};
use crate::domain::ports::ElementSampler;
use crate::services::dispatcher::RoundDispatcher;
use crate::services::element_catalog::ElementCatalog;
use crate::services::selection::{disjoint_pairs, pairs_with_anchor, pairs_with_base};

/// Which pair builder a round uses.
#[derive(Debug, Clone)]
pub enum PairStrategy {
    /// Each element of the subset with every base element.
    WithBase,
    /// Disjoint pairs within the subset, at most this many.
    Disjoint(usize),
    /// The anchor with each element of the subset.
    Anchored(Element),
}

/// Runs crafting modes over a catalog, a dispatcher and a sampler.
pub struct CraftingEngine {
    catalog: ElementCatalog,
    dispatcher: RoundDispatcher,
    sampler: Arc<dyn ElementSampler>,
    base: Vec<Element>,
    config: EngineConfig,
    span: Span,
}

impl CraftingEngine {
    /// Engine over the standard base set. Call [`Self::load`] before running.
    pub fn new(
        catalog: ElementCatalog,
        dispatcher: RoundDispatcher,
        sampler: Arc<dyn ElementSampler>,
        config: EngineConfig,
    ) -> Self {
        Self {
            catalog,
            dispatcher,
            sampler,
            base: Element::base_set(),
            config,
            span: tracing::info_span!("crafting_engine"),
        }
    }

    /// Override the base elements (tests use reduced sets).
    #[must_use]
    pub fn with_base(mut self, base: Vec<Element>) -> Self {
        self.base = base;
        self
    }

    /// Replace the span this engine logs under.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Known and staged elements.
    pub fn catalog(&self) -> &ElementCatalog {
        &self.catalog
    }

    pub fn base(&self) -> &[Element] {
        &self.base
    }

    /// Load the known set from the store.
    pub async fn load(&mut self) -> DomainResult<usize> {
        self.catalog.load().await
    }

    /// Parse a textual mode and run it. Unknown modes fail before any I/O.
    pub async fn run_code(&mut self, mode: &str, options: &CraftOptions) -> DomainResult<CraftReport> {
        let mode: CraftMode = mode.parse()?;
        self.run(mode, options).await
    }

    /// Run one engine invocation.
    pub async fn run(&mut self, mode: CraftMode, options: &CraftOptions) -> DomainResult<CraftReport> {
        let span = tracing::info_span!(parent: &self.span, "craft", mode = %mode);
        Self::validate_options(mode, options)?;
        async {
            tracing::info!(count = options.count, "crafting with mode {mode}");
            let pairs = self.first_round_pairs(mode, options)?;
            let report = if mode.iterates() {
                self.run_to_closure(mode, pairs, options).await?
            } else {
                self.single_round(mode, &pairs).await?
            };
            tracing::info!(
                rounds = report.rounds.len(),
                discovered = report.discovered_count(),
                total_known = report.total_known,
                "crafting finished"
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }

    fn validate_options(mode: CraftMode, options: &CraftOptions) -> DomainResult<()> {
        if mode.samples() && options.count == 0 {
            return Err(DomainError::InvalidOptions(format!("mode {mode} needs a count of at least 1")));
        }
        if options.max_rounds == Some(0) {
            return Err(DomainError::InvalidOptions("max_rounds must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Up to `count` distinct known elements, chosen by the sampler.
    pub fn sample_known(&self, count: usize) -> Vec<Element> {
        let pool = self.catalog.known().to_vec();
        let sample = self.sampler.sample(&pool, count);
        if sample.len() < count {
            tracing::warn!(
                requested = count,
                available = sample.len(),
                sampler = self.sampler.name(),
                "not enough elements"
            );
        }
        sample
    }

    /// Distinct pairs to look up for `subset` under `strategy`.
    pub fn build_pairs(&self, strategy: &PairStrategy, subset: &[Element]) -> BTreeSet<Pair> {
        match strategy {
            PairStrategy::WithBase => pairs_with_base(subset, &self.base),
            PairStrategy::Disjoint(max_pairs) => disjoint_pairs(subset, *max_pairs),
            PairStrategy::Anchored(anchor) => pairs_with_anchor(anchor, subset),
        }
    }

    /// Pairs looked up by the first round of `mode`. Named elements are
    /// resolved here, so a missing one fails before any fetch.
    pub fn first_round_pairs(&self, mode: CraftMode, options: &CraftOptions) -> DomainResult<BTreeSet<Pair>> {
        let pairs = match mode {
            CraftMode::ExhaustiveBase => {
                let known = self.catalog.known().to_vec();
                tracing::info!(
                    operands = known.len(),
                    base = self.base.len(),
                    "combining known elements with all base elements"
                );
                self.build_pairs(&PairStrategy::WithBase, &known)
            }
            CraftMode::RandomWithBase => {
                tracing::info!("combining {} random elements with all base elements", options.count);
                let subset = self.sample_known(options.count);
                self.build_pairs(&PairStrategy::WithBase, &subset)
            }
            CraftMode::RandomWithRandom => {
                tracing::info!("combining {0} random elements with {0} random elements", options.count);
                let subset = self.sample_known(options.count.saturating_mul(2));
                self.build_pairs(&PairStrategy::Disjoint(options.count), &subset)
            }
            CraftMode::SpecificWithRandom => {
                let anchor = self.resolve_named(options.first.as_deref(), "first")?;
                tracing::info!("combining {anchor} with {} random elements", options.count);
                let subset = self.sample_known(options.count);
                self.build_pairs(&PairStrategy::Anchored(anchor), &subset)
            }
            CraftMode::SpecificPair => {
                let first = self.resolve_named(options.first.as_deref(), "first")?;
                let second = self.resolve_named(options.second.as_deref(), "second")?;
                tracing::info!("combining {first} with {second}");
                BTreeSet::from([Pair::new(first, second)])
            }
        };
        Ok(pairs)
    }

    /// Keep pairing each round's discoveries with the base set until a
    /// round finds nothing or `max_rounds` is reached.
    async fn run_to_closure(
        &mut self,
        mode: CraftMode,
        mut pairs: BTreeSet<Pair>,
        options: &CraftOptions,
    ) -> DomainResult<CraftReport> {
        let max_rounds = options.max_rounds.or(self.config.max_rounds);
        let mut report = CraftReport::new(mode);

        let mut round = 1;
        loop {
            let round_report = self.run_round(round, &pairs).await?;
            let discovered = round_report.discovered.clone();
            report.rounds.push(round_report);

            if discovered.is_empty() {
                tracing::info!(round, "no new elements, stopping");
                break;
            }
            if max_rounds.is_some_and(|max| round >= max) {
                tracing::info!(round, "reached max rounds, stopping");
                report.truncated = true;
                break;
            }

            let operands = if self.config.rescan_all_known {
                self.catalog.known().to_vec()
            } else {
                discovered
            };
            pairs = self.build_pairs(&PairStrategy::WithBase, &operands);
            round += 1;
        }

        report.total_known = self.catalog.known().len();
        Ok(report)
    }

    async fn single_round(&mut self, mode: CraftMode, pairs: &BTreeSet<Pair>) -> DomainResult<CraftReport> {
        let mut report = CraftReport::new(mode);
        report.rounds.push(self.run_round(1, pairs).await?);
        report.total_known = self.catalog.known().len();
        Ok(report)
    }

    /// Dispatch, join, merge, persist.
    async fn run_round(&mut self, round: usize, pairs: &BTreeSet<Pair>) -> DomainResult<RoundReport> {
        if pairs.len() > self.config.large_round_warning {
            tracing::warn!(round, pairs = pairs.len(), "large round, this may take a while");
        }

        let results = self.dispatcher.dispatch(round, pairs).await?;
        let failed = results.failed();
        let discovered = self.catalog.merge(results.into_elements());
        self.catalog.persist().await?;

        for element in &discovered {
            tracing::info!(round, element = %element, first_discovery = element.is_new(), "discovered");
        }
        tracing::info!(round, pairs = pairs.len(), failed, discovered = discovered.len(), "round complete");

        Ok(RoundReport {
            round,
            pairs_dispatched: pairs.len(),
            failed,
            discovered,
        })
    }

    /// Look a named element up in the known set, then the base set.
    fn resolve_named(&self, name: Option<&str>, option: &str) -> DomainResult<Element> {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| DomainError::InvalidOptions(format!("option '{option}' is required for this mode")))?;

        self.catalog
            .known()
            .get(name)
            .or_else(|| self.base.iter().find(|b| b.name() == name))
            .cloned()
            .ok_or_else(|| DomainError::ElementNotFound(name.to_string()))
    }
}
