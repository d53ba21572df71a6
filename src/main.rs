//! confstore CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;

use confstore::cli::{handle_error, Cli, Commands};
use confstore::domain::models::Settings;
use confstore::infrastructure::config::SettingsLoader;
use confstore::infrastructure::logging::{LogConfig, LoggerImpl};

fn load_settings(cli: &Cli) -> Result<Settings> {
    match cli.config {
        Some(ref path) => SettingsLoader::load_from_file(path),
        None => SettingsLoader::load(),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli)?;

    let log_config = LogConfig::try_from(&settings.logging).map_err(anyhow::Error::msg)?;
    let _logger = LoggerImpl::init(&log_config).context("Failed to initialize logging")?;

    tracing::debug!(backend = ?settings.backend.kind, "settings loaded");

    match cli.command {
        Commands::Init(args) => confstore::cli::commands::init::execute(args, &settings, cli.json).await,
        Commands::Config(args) => confstore::cli::commands::config::execute(args, &settings, cli.json).await,
        Commands::Group(args) => confstore::cli::commands::group::execute(args, &settings, cli.json).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    if let Err(err) = run(cli).await {
        handle_error(err, json_mode);
    }
}
