//! Command-line interface for confstore.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::errors::StoreError;
use commands::config::ConfigArgs;
use commands::group::GroupArgs;
use commands::init::InitArgs;

#[derive(Parser, Debug)]
#[command(name = "confstore")]
#[command(about = "Versioned configuration and config-group store", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Settings file to load instead of .confstore/config.yaml
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the .confstore directory and database
    Init(InitArgs),

    /// Config management commands
    Config(ConfigArgs),

    /// Config group management commands
    Group(GroupArgs),
}

/// Print `err` and exit with a non-zero status.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let kind = error_kind(&err);

    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
            "kind": kind,
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }

    std::process::exit(1);
}

fn error_kind(err: &anyhow::Error) -> &'static str {
    let store_error = err.chain().find_map(|cause| cause.downcast_ref::<StoreError>());
    match store_error {
        Some(StoreError::NotFound { .. }) => "not_found",
        Some(StoreError::AlreadyExists { .. }) => "already_exists",
        Some(StoreError::InvalidInput(_)) => "invalid_input",
        Some(StoreError::Storage(_)) => "storage",
        None => "error",
    }
}
