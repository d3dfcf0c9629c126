//! Implementation of the `crafter list` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::context::open_store;
use crate::cli::display::{list_table, render_list};
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::{Config, Element, KnownElements};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Show at most this many elements
    #[arg(long, short)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub total: usize,
    pub elements: Vec<Element>,
}

impl CommandOutput for ListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["glyph", "name", "first discovery"]);
        for element in &self.elements {
            table.add_row(vec![
                element.glyph().to_string(),
                truncate(element.name(), 48),
                if element.is_new() { "yes" } else { "" }.to_string(),
            ]);
        }
        render_list("element", table, self.elements.len(), self.total)
    }
}

/// Print the known set.
pub async fn execute(args: ListArgs, config: &Config, json_mode: bool) -> Result<()> {
    let store = open_store(&config.store).await?;
    let known: KnownElements = store
        .load()
        .await
        .context("Failed to load known elements")?
        .into_iter()
        .filter(|e| !e.is_sentinel())
        .collect();

    let total = known.len();
    let elements = known
        .iter()
        .take(args.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();

    output(&ListOutput { total, elements }, json_mode);
    Ok(())
}
