//! Implementation of the `crafter export` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::context::open_store;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::services::{export_elements, ExportFormat, CHROME_STORAGE_KEY};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// chrome (browser local storage) or json (store document)
    #[arg(long, short, default_value = "chrome")]
    pub format: ExportFormat,

    /// Write to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct ExportOutput {
    pub format: String,
    pub path: PathBuf,
    pub exported: usize,
}

impl CommandOutput for ExportOutput {
    fn to_human(&self) -> String {
        let mut message = format!(
            "Exported {} element(s) as {} to {}",
            self.exported,
            self.format,
            self.path.display()
        );
        if self.format == ExportFormat::Chrome.to_string() {
            message.push_str(&format!("\nPaste it into local storage under the '{CHROME_STORAGE_KEY}' key."));
        }
        message
    }
}

/// Write the known set in the requested format.
pub async fn execute(args: ExportArgs, config: &Config, json_mode: bool) -> Result<()> {
    let store = open_store(&config.store).await?;
    let elements = store.load().await.context("Failed to load known elements")?;
    let document = export_elements(&elements, args.format)?;

    match args.output {
        Some(path) => {
            tokio::fs::write(&path, &document)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            let exported = elements.iter().filter(|e| !e.is_sentinel()).count();
            output(
                &ExportOutput {
                    format: args.format.to_string(),
                    path,
                    exported,
                },
                json_mode,
            );
        }
        // The document is already JSON; print it as-is in both modes.
        None => println!("{document}"),
    }
    Ok(())
}
