//! Unordered element pairs, the unit of dispatch.

use serde::Serialize;
use std::fmt;

use super::element::Element;

/// An unordered combination of two elements.
///
/// The elements are stored in name order, so `Pair::new(a, b)` and
/// `Pair::new(b, a)` are the same value and collapse in any set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Pair {
    first: Element,
    second: Element,
}

impl Pair {
    pub fn new(a: Element, b: Element) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// The element whose name sorts first.
    pub fn first(&self) -> &Element {
        &self.first
    }

    pub fn second(&self) -> &Element {
        &self.second
    }

    /// Whether `element` is one of the two operands.
    pub fn contains(&self, element: &Element) -> bool {
        &self.first == element || &self.second == element
    }

    /// Canonical text key, e.g. `Fire+Water`.
    pub fn key(&self) -> String {
        format!("{}+{}", self.first.name(), self.second.name())
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}", self.first, self.second)
    }
}
