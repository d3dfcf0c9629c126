//! Crafter CLI entry point.

use clap::Parser;

use crafter::cli::{handle_error, Cli, Commands};
use crafter::infrastructure::config::ConfigLoader;
use crafter::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Init(args) => crafter::cli::commands::init::execute(args, &config, cli.json).await,
        Commands::Craft(args) => crafter::cli::commands::craft::execute(args, &config, cli.json).await,
        Commands::List(args) => crafter::cli::commands::list::execute(args, &config, cli.json).await,
        Commands::Export(args) => crafter::cli::commands::export::execute(args, &config, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
