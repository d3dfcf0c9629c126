//! Export of the known set.
//!
//! `chrome` produces the document the game keeps in browser local storage
//! under the `infinite-craft-data` key, so a discovered catalog can be
//! pasted straight into a browser session. `json` produces the same
//! document the JSON file store reads.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Element;

/// Local-storage key the chrome document belongs under.
pub const CHROME_STORAGE_KEY: &str = "infinite-craft-data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Chrome,
    Json,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chrome => write!(f, "chrome"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chrome" => Ok(Self::Chrome),
            "json" => Ok(Self::Json),
            other => Err(DomainError::InvalidOptions(format!(
                "unknown export format '{other}', expected chrome or json"
            ))),
        }
    }
}

#[derive(Serialize)]
struct ChromeEntry<'a> {
    text: &'a str,
    emoji: &'a str,
    discovered: bool,
}

#[derive(Serialize)]
struct Document<T> {
    elements: Vec<T>,
}

/// Render `elements` in `format`. Sentinels are skipped.
pub fn export_elements<'a, I>(elements: I, format: ExportFormat) -> DomainResult<String>
where
    I: IntoIterator<Item = &'a Element>,
{
    let elements = elements.into_iter().filter(|e| !e.is_sentinel());
    let rendered = match format {
        ExportFormat::Chrome => {
            let entries: Vec<ChromeEntry<'_>> = elements
                .map(|e| ChromeEntry {
                    text: e.name(),
                    emoji: e.glyph(),
                    discovered: e.is_new(),
                })
                .collect();
            serde_json::to_string(&Document { elements: entries })?
        }
        ExportFormat::Json => {
            let entries: Vec<&Element> = elements.collect();
            serde_json::to_string_pretty(&Document { elements: entries })?
        }
    };
    Ok(rendered)
}
