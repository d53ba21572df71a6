//! Implementation of the `confstore init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::adapters::sqlite::{initialize_database, PoolConfig};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{BackendKind, Settings};

const STATE_DIR: &str = ".confstore";
const SETTINGS_FILE: &str = "config.yaml";

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Remove the existing .confstore directory first
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub initialized_path: PathBuf,
    pub settings_written: bool,
    pub database_url: Option<String>,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.settings_written {
            lines.push(format!("\nWrote {STATE_DIR}/{SETTINGS_FILE}"));
        }
        if let Some(url) = &self.database_url {
            lines.push(format!("\nDatabase initialized at {url}"));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: InitArgs, settings: &Settings, json_mode: bool) -> Result<()> {
    let target_path = std::env::current_dir().context("Failed to get current directory")?;
    let out = initialize(&target_path, args.force, settings).await?;
    output(&out, json_mode);
    Ok(())
}

async fn initialize(target_path: &Path, force: bool, settings: &Settings) -> Result<InitOutput> {
    let state_dir = target_path.join(STATE_DIR);

    if state_dir.exists() && !force {
        return Ok(InitOutput {
            success: false,
            message: "Project already initialized. Use --force to reinitialize.".to_string(),
            initialized_path: target_path.to_path_buf(),
            settings_written: false,
            database_url: None,
        });
    }

    if force && state_dir.exists() {
        fs::remove_dir_all(&state_dir)
            .await
            .with_context(|| format!("Failed to remove existing {}", state_dir.display()))?;
    }

    fs::create_dir_all(&state_dir)
        .await
        .with_context(|| format!("Failed to create {}", state_dir.display()))?;

    let settings_path = state_dir.join(SETTINGS_FILE);
    let yaml = serde_yaml::to_string(settings).context("Failed to serialize settings")?;
    fs::write(&settings_path, yaml)
        .await
        .with_context(|| format!("Failed to write {}", settings_path.display()))?;

    let database_url = match settings.backend.kind {
        BackendKind::Sqlite => {
            let url = resolve_database_url(target_path, &settings.backend.database_url);
            let pool = initialize_database(&url, Some(PoolConfig::from(&settings.backend)))
                .await
                .context("Failed to initialize database")?;
            pool.close().await;
            Some(url)
        }
        BackendKind::Memory => None,
    };

    Ok(InitOutput {
        success: true,
        message: if force {
            "Project reinitialized successfully.".to_string()
        } else {
            "Project initialized successfully.".to_string()
        },
        initialized_path: target_path.to_path_buf(),
        settings_written: true,
        database_url,
    })
}

/// Anchor a relative `sqlite:` path at `base`. Absolute paths, in-memory
/// databases and other URL forms are returned unchanged.
fn resolve_database_url(base: &Path, url: &str) -> String {
    match url.strip_prefix("sqlite:") {
        Some(path) if !path.starts_with('/') && !path.starts_with(':') && !path.starts_with("//") => {
            format!("sqlite:{}", base.join(path).display())
        }
        _ => url.to_string(),
    }
}
