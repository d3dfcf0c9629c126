//! Implementation of the `crafter init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::fs;

use crate::cli::context::open_store;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, StoreBackend};
use crate::infrastructure::config::{ConfigLoader, CONFIG_DIR};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Rewrite config.yaml even if the project is already initialized.
    /// Known elements are kept.
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub config_path: PathBuf,
    pub config_written: bool,
    pub store_backend: String,
    pub store_path: String,
    pub known_elements: usize,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push(format!("  config: {}", self.config_path.display()));
        }
        lines.push(format!("  store:  {} ({})", self.store_path, self.store_backend));
        if self.known_elements > 0 {
            lines.push(format!("  known elements: {}", self.known_elements));
        }
        lines.join("\n")
    }
}

/// Write the project config and open the store.
pub async fn execute(args: InitArgs, config: &Config, json_mode: bool) -> Result<()> {
    let root = std::env::current_dir().context("Failed to get current directory")?;
    let crafter_dir = root.join(CONFIG_DIR);
    let config_path = ConfigLoader::project_config_path(&root);
    let already = config_path.exists();

    fs::create_dir_all(&crafter_dir)
        .await
        .with_context(|| format!("Failed to create {}", crafter_dir.display()))?;

    let config_written = !already || args.force;
    if config_written {
        let yaml = serde_yaml::to_string(&Config::default()).context("Failed to render default config")?;
        fs::write(&config_path, yaml)
            .await
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
    }

    let store = open_store(&config.store).await?;
    let known_elements = store
        .load()
        .await
        .context("Failed to read the element store")?
        .len();

    let store_path = match config.store.backend {
        StoreBackend::Sqlite => config.store.sqlite_path.clone(),
        StoreBackend::Json => config.store.json_path.clone(),
    };

    let message = match (already, args.force) {
        (false, _) => "Project initialized.",
        (true, true) => "Project reinitialized; config.yaml rewritten.",
        (true, false) => "Project already initialized. Use --force to rewrite config.yaml.",
    };

    output(
        &InitOutput {
            success: true,
            message: message.to_string(),
            config_path,
            config_written,
            store_backend: store.backend_name().to_string(),
            store_path,
            known_elements,
        },
        json_mode,
    );
    Ok(())
}
