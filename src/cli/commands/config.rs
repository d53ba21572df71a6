//! Config CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use super::{open_store, parse_entries, read_json_file, CliStore};
use crate::cli::output::{format_map, output, table, truncate, CommandOutput};
use crate::domain::models::{Config, Settings};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Where a config's entries come from.
#[derive(Args, Debug)]
pub struct ConfigSource {
    /// Config version
    #[arg(short, long)]
    pub version: Option<String>,

    /// Entry in key=value form (repeatable)
    #[arg(short, long = "entry", value_name = "KEY=VALUE")]
    pub entries: Vec<String>,

    /// JSON file holding the config record
    #[arg(short, long, conflicts_with = "entries")]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Create a new config with a generated id
    Add(ConfigSource),
    /// Write a version of an existing config id (overwrites)
    Version {
        /// Config ID
        id: String,
        #[command(flatten)]
        source: ConfigSource,
    },
    /// Show one config version
    Get {
        /// Config ID
        id: String,
        /// Config version
        version: String,
    },
    /// List all versions of a config
    Versions {
        /// Config ID
        id: String,
    },
    /// List every stored config
    List,
    /// Delete one config version
    Delete {
        /// Config ID
        id: String,
        /// Config version
        version: String,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct ConfigOutput {
    pub id: String,
    pub version: String,
    pub entries: std::collections::BTreeMap<String, String>,
}

impl From<Config> for ConfigOutput {
    fn from(config: Config) -> Self {
        Self {
            id: config.id,
            version: config.version,
            entries: config.entries,
        }
    }
}

impl CommandOutput for ConfigOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("Config: {}", self.id), format!("Version: {}", self.version)];

        if self.entries.is_empty() {
            lines.push("Entries: (none)".to_string());
        } else {
            lines.push("Entries:".to_string());
            for (key, value) in &self.entries {
                lines.push(format!("  {key} = {value}"));
            }
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ConfigListOutput {
    pub configs: Vec<ConfigOutput>,
    pub total: usize,
}

impl CommandOutput for ConfigListOutput {
    fn to_human(&self) -> String {
        if self.configs.is_empty() {
            return "No configs found.".to_string();
        }

        let rows = self.configs.iter().map(|c| {
            vec![
                c.id.clone(),
                c.version.clone(),
                truncate(&format_map(&c.entries, '='), 60),
            ]
        });
        format!("Found {} config(s):\n{}", self.total, table(&["ID", "VERSION", "ENTRIES"], rows))
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl From<Vec<Config>> for ConfigListOutput {
    fn from(configs: Vec<Config>) -> Self {
        Self {
            total: configs.len(),
            configs: configs.into_iter().map(ConfigOutput::from).collect(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ConfigActionOutput {
    pub success: bool,
    pub message: String,
    pub config: Option<ConfigOutput>,
}

impl CommandOutput for ConfigActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Build the config record from `--file` or `--version`/`--entry`.
/// A `--version` flag overrides the version found in the file.
async fn load_config(source: ConfigSource) -> Result<Config> {
    let mut config = match source.file {
        Some(ref path) => read_json_file::<Config>(path).await?,
        None => Config {
            entries: parse_entries(&source.entries)?,
            ..Config::default()
        },
    };

    if let Some(version) = source.version {
        config.version = version;
    }
    Ok(config)
}

pub async fn execute(args: ConfigArgs, settings: &Settings, json_mode: bool) -> Result<()> {
    let store = open_store(settings).await?;
    run(&store, args.command, json_mode).await
}

async fn run(store: &CliStore, command: ConfigCommands, json_mode: bool) -> Result<()> {
    match command {
        ConfigCommands::Add(source) => {
            let mut config = load_config(source).await?;
            // ids are always minted by the store
            config.id = String::new();
            let config = store.add_config(config).await.context("Failed to add config")?;

            let out = ConfigActionOutput {
                success: true,
                message: format!("Config created: {} (version {})", config.id, config.version),
                config: Some(ConfigOutput::from(config)),
            };
            output(&out, json_mode);
        }

        ConfigCommands::Version { id, source } => {
            let mut config = load_config(source).await?;
            config.id = id;
            let config = store
                .add_config_version(config)
                .await
                .context("Failed to add config version")?;

            let out = ConfigActionOutput {
                success: true,
                message: format!("Config version written: {} (version {})", config.id, config.version),
                config: Some(ConfigOutput::from(config)),
            };
            output(&out, json_mode);
        }

        ConfigCommands::Get { id, version } => {
            let config = store.get_config(&id, &version).await?;
            output(&ConfigOutput::from(config), json_mode);
        }

        ConfigCommands::Versions { id } => {
            let configs = store.get_config_versions(&id).await?;
            output(&ConfigListOutput::from(configs), json_mode);
        }

        ConfigCommands::List => {
            let configs = store.get_all_configs().await?;
            output(&ConfigListOutput::from(configs), json_mode);
        }

        ConfigCommands::Delete { id, version } => {
            store.delete_config(&id, &version).await?;

            let out = ConfigActionOutput {
                success: true,
                message: format!("Config deleted: {id} (version {version})"),
                config: None,
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
