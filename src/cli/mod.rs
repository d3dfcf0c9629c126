//! Command-line interface.

pub mod commands;
pub mod context;
pub mod display;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::errors::DomainError;

#[derive(Parser, Debug)]
#[command(name = "crafter", version, about = "Explore element combinations against a remote crafting service")]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file to use instead of .crafter/config.yaml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create .crafter/ with a default config and an empty store
    Init(commands::init::InitArgs),
    /// Run one crafting session
    Craft(commands::craft::CraftArgs),
    /// Show known elements
    List(commands::list::ListArgs),
    /// Dump known elements in a portable format
    Export(commands::export::ExportArgs),
}

/// Print `err` (as JSON in json mode) and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let kind = err
        .downcast_ref::<DomainError>()
        .map_or("error", DomainError::kind);

    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": kind,
            "message": format!("{err:#}"),
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", console::style("error:").red().bold());
    }
    std::process::exit(1);
}
