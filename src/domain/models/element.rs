//! Element domain model.
//!
//! An element is identified by its name alone. Glyph and provenance are
//! carried along for display and storage but never take part in equality,
//! so any set of elements is effectively keyed by name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::domain::errors::{DomainError, DomainResult};

/// Name of the placeholder returned for failed or malformed lookups.
pub const ERROR_ELEMENT_NAME: &str = "Error";

/// Name the remote service answers with when a pair combines into nothing.
pub const NOTHING_ELEMENT_NAME: &str = "Nothing";

/// A discovered (or base) element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ElementPayload")]
pub struct Element {
    #[serde(rename = "result")]
    name: String,
    #[serde(rename = "emoji")]
    glyph: String,
    #[serde(rename = "isNew")]
    is_new: bool,
}

impl Element {
    /// Create an element, rejecting empty names.
    pub fn new(
        name: impl Into<String>,
        glyph: impl Into<String>,
        is_new: bool,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidElement(
                "element name cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            name,
            glyph: glyph.into(),
            is_new,
        })
    }

    /// Literal constructor for the fixed elements defined in this module.
    fn fixed(name: &str, glyph: &str) -> Self {
        Self {
            name: name.to_string(),
            glyph: glyph.to_string(),
            is_new: false,
        }
    }

    /// The sentinel substituted for any failed remote lookup.
    pub fn error() -> Self {
        Self::fixed(ERROR_ELEMENT_NAME, "❌")
    }

    /// The element the remote service reports for pairs that yield nothing.
    pub fn nothing() -> Self {
        Self::fixed(NOTHING_ELEMENT_NAME, "🚫")
    }

    /// The four primitives every exploration starts from.
    pub fn base_set() -> Vec<Self> {
        vec![
            Self::fixed("Wind", "🌬️"),
            Self::fixed("Earth", "🌍"),
            Self::fixed("Fire", "🔥"),
            Self::fixed("Water", "💧"),
        ]
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    /// Whether the remote service reported this as a first-ever discovery.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Sentinels are placeholders, not discoveries, and never enter the known set.
    pub fn is_sentinel(&self) -> bool {
        self.name == ERROR_ELEMENT_NAME || self.name == NOTHING_ELEMENT_NAME
    }

    pub fn is_error(&self) -> bool {
        self.name == ERROR_ELEMENT_NAME
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Element {}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Element {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Element {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.glyph, self.name)
    }
}

/// Wire shape of an element as served by the remote API and stored on disk.
#[derive(Debug, Deserialize)]
struct ElementPayload {
    result: String,
    emoji: String,
    #[serde(rename = "isNew")]
    is_new: BoolLike,
}

/// The remote service is loose about `isNew`; older dumps store it as text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BoolLike {
    Bool(bool),
    Number(i64),
    Text(String),
}

impl BoolLike {
    fn into_bool(self) -> Result<bool, String> {
        match self {
            Self::Bool(b) => Ok(b),
            Self::Number(n) => Ok(n != 0),
            Self::Text(s) => match s.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" | "" => Ok(false),
                other => Err(format!("not a boolean: {other}")),
            },
        }
    }
}

impl TryFrom<ElementPayload> for Element {
    type Error = DomainError;

    fn try_from(payload: ElementPayload) -> Result<Self, Self::Error> {
        let is_new = payload
            .is_new
            .into_bool()
            .map_err(DomainError::InvalidElement)?;
        Self::new(payload.result, payload.emoji, is_new)
    }
}

/// The accumulating set of known elements, keyed by name.
///
/// Backed by a `BTreeMap` so iteration is in name order, which keeps the
/// ordered sampler and all listings reproducible.
#[derive(Debug, Clone, Default)]
pub struct KnownElements {
    elements: BTreeMap<String, Element>,
}

impl KnownElements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an element. Returns `false` (and leaves the set unchanged) when
    /// an element with the same name is already present.
    pub fn insert(&mut self, element: Element) -> bool {
        if self.elements.contains_key(element.name()) {
            return false;
        }
        self.elements.insert(element.name.clone(), element);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.elements.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Element> {
        self.elements.get(name)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Snapshot of all elements in name order.
    pub fn to_vec(&self) -> Vec<Element> {
        self.elements.values().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }
}

impl FromIterator<Element> for KnownElements {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        let mut known = Self::new();
        for element in iter {
            known.insert(element);
        }
        known
    }
}

impl Extend<Element> for KnownElements {
    fn extend<I: IntoIterator<Item = Element>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}
