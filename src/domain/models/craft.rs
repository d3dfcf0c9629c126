//! Crafting modes, their options, and run reports.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::element::Element;
use crate::domain::errors::DomainError;

/// Pair-selection strategy for one engine invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CraftMode {
    /// Pair every operand with every base element until a round finds nothing new.
    ExhaustiveBase,
    /// Pair `count` sampled known elements with every base element, once.
    RandomWithBase,
    /// Pair `2 * count` sampled known elements with each other, once.
    RandomWithRandom,
    /// Pair one named element with `count` sampled known elements, once.
    SpecificWithRandom,
    /// Combine exactly two named elements.
    SpecificPair,
}

impl CraftMode {
    pub const ALL: [Self; 5] = [
        Self::ExhaustiveBase,
        Self::RandomWithBase,
        Self::RandomWithRandom,
        Self::SpecificWithRandom,
        Self::SpecificPair,
    ];

    pub const fn code(self) -> u8 {
        match self {
            Self::ExhaustiveBase => 0,
            Self::RandomWithBase => 1,
            Self::RandomWithRandom => 2,
            Self::SpecificWithRandom => 3,
            Self::SpecificPair => 4,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExhaustiveBase => "exhaustive-base",
            Self::RandomWithBase => "random-with-base",
            Self::RandomWithRandom => "random-with-random",
            Self::SpecificWithRandom => "specific-with-random",
            Self::SpecificPair => "specific-pair",
        }
    }

    /// Only the exhaustive mode runs more than one round.
    pub const fn iterates(self) -> bool {
        matches!(self, Self::ExhaustiveBase)
    }

    /// Modes that draw `count` elements from the known set.
    pub const fn samples(self) -> bool {
        matches!(
            self,
            Self::RandomWithBase | Self::RandomWithRandom | Self::SpecificWithRandom
        )
    }
}

impl fmt::Display for CraftMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CraftMode {
    type Err = DomainError;

    /// Accepts the numeric code or the kebab-case name (underscores allowed).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return Self::try_from(code);
        }
        let normalized = trimmed.to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| DomainError::InvalidMode(s.to_string()))
    }
}

impl TryFrom<u8> for CraftMode {
    type Error = DomainError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.code() == code)
            .ok_or_else(|| DomainError::InvalidMode(code.to_string()))
    }
}

/// Mode-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftOptions {
    /// Sample size for the random modes.
    pub count: usize,
    /// Named element for the specific modes.
    pub first: Option<String>,
    /// Second named element for `specific-pair`.
    pub second: Option<String>,
    /// Stop the exhaustive loop after this many rounds.
    pub max_rounds: Option<usize>,
}

/// Sample size when none is given.
pub const DEFAULT_SAMPLE_COUNT: usize = 5;

impl Default for CraftOptions {
    fn default() -> Self {
        Self {
            count: DEFAULT_SAMPLE_COUNT,
            first: None,
            second: None,
            max_rounds: None,
        }
    }
}

impl CraftOptions {
    pub fn with_count(count: usize) -> Self {
        Self {
            count,
            ..Default::default()
        }
    }
}

/// Statistics for one dispatched round.
#[derive(Debug, Clone, Serialize)]
pub struct RoundReport {
    pub round: usize,
    pub pairs_dispatched: usize,
    pub failed: usize,
    pub discovered: Vec<Element>,
}

/// Outcome of one engine invocation.
#[derive(Debug, Clone, Serialize)]
pub struct CraftReport {
    pub mode: CraftMode,
    pub rounds: Vec<RoundReport>,
    pub total_known: usize,
    /// True when the exhaustive loop stopped at `max_rounds` rather than at a fixed point.
    pub truncated: bool,
}

impl CraftReport {
    pub fn new(mode: CraftMode) -> Self {
        Self {
            mode,
            rounds: Vec::new(),
            total_known: 0,
            truncated: false,
        }
    }

    /// Every element discovered across all rounds, in discovery order.
    pub fn discovered(&self) -> impl Iterator<Item = &Element> {
        self.rounds.iter().flat_map(|r| r.discovered.iter())
    }

    pub fn discovered_count(&self) -> usize {
        self.rounds.iter().map(|r| r.discovered.len()).sum()
    }

    pub fn pairs_dispatched(&self) -> usize {
        self.rounds.iter().map(|r| r.pairs_dispatched).sum()
    }

    pub fn failed(&self) -> usize {
        self.rounds.iter().map(|r| r.failed).sum()
    }
}
