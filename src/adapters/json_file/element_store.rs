//! JSON file implementation of the ElementStore.
//!
//! The whole known set lives in one document:
//!
//! ```json
//! {"elements": [{"result": "Steam", "emoji": "💨", "isNew": false}]}
//! ```
//!
//! Persisting reads the current document, upserts by name and replaces the
//! file via a temporary sibling and a rename.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Element;
use crate::domain::ports::ElementStore;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ElementDocument {
    #[serde(default)]
    elements: Vec<Element>,
}

/// Element store kept as a single JSON document.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> DomainResult<ElementDocument> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(ElementDocument::default()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                DomainError::SerializationError(format!(
                    "{} is not a valid element document: {e}",
                    self.path.display()
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "element file not found, creating it");
                let empty = ElementDocument::default();
                self.write_document(&empty).await?;
                Ok(empty)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_document(&self, document: &ElementDocument) -> DomainResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let body = serde_json::to_string_pretty(document)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, body).await?;
        fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ElementStore for JsonFileStore {
    fn backend_name(&self) -> &'static str {
        "json"
    }

    async fn load(&self) -> DomainResult<Vec<Element>> {
        let _guard = self.write_lock.lock().await;
        let document = self.read_document().await?;
        tracing::debug!(path = %self.path.display(), count = document.elements.len(), "loaded elements from json");
        Ok(document.elements)
    }

    async fn persist(&self, elements: &[Element]) -> DomainResult<()> {
        if elements.is_empty() {
            return Ok(());
        }

        let _guard = self.write_lock.lock().await;
        let document = self.read_document().await?;

        let mut by_name: BTreeMap<String, Element> = document
            .elements
            .into_iter()
            .map(|e| (e.name().to_string(), e))
            .collect();
        for element in elements {
            by_name.insert(element.name().to_string(), element.clone());
        }

        let merged = ElementDocument {
            elements: by_name.into_values().collect(),
        };
        self.write_document(&merged).await?;

        tracing::debug!(path = %self.path.display(), written = elements.len(), total = merged.elements.len(), "persisted elements to json");
        Ok(())
    }
}
