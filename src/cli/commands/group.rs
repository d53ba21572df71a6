//! Config group CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::{open_store, read_json_file, CliStore};
use crate::cli::output::{format_map, output, table, truncate, CommandOutput};
use crate::domain::models::{ConfigForGroup, Group, Settings};

#[derive(Args, Debug)]
pub struct GroupArgs {
    #[command(subcommand)]
    pub command: GroupCommands,
}

#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// Create a new group with a generated id
    Add {
        /// JSON file holding the group record
        #[arg(short, long)]
        file: PathBuf,
        /// Overrides the version in the file
        #[arg(short, long)]
        version: Option<String>,
    },
    /// Write a version of an existing group id (overwrites)
    Version {
        /// Group ID
        id: String,
        /// JSON file holding the group record
        #[arg(short, long)]
        file: PathBuf,
        /// Overrides the version in the file
        #[arg(short, long)]
        version: Option<String>,
    },
    /// Replace an existing group version
    Update {
        /// Group ID
        id: String,
        /// Group version
        version: String,
        /// JSON file holding the group record
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Show one group version
    Get {
        /// Group ID
        id: String,
        /// Group version
        version: String,
    },
    /// List all versions of a group
    Versions {
        /// Group ID
        id: String,
    },
    /// List every stored group
    List,
    /// Delete one group version
    Delete {
        /// Group ID
        id: String,
        /// Group version
        version: String,
    },
    /// Select the variants whose labels equal a query like "env:prod;region:eu"
    Select {
        /// Group ID
        id: String,
        /// Group version
        version: String,
        /// Label query
        labels: String,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct VariantOutput {
    pub entries: BTreeMap<String, String>,
    pub values: BTreeMap<String, String>,
}

impl From<ConfigForGroup> for VariantOutput {
    fn from(variant: ConfigForGroup) -> Self {
        Self {
            entries: variant.entries,
            values: variant.values,
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct GroupOutput {
    pub id: String,
    pub version: String,
    pub configs: Vec<VariantOutput>,
}

impl From<Group> for GroupOutput {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            version: group.version,
            configs: group
                .configs
                .unwrap_or_default()
                .into_iter()
                .map(VariantOutput::from)
                .collect(),
        }
    }
}

fn variant_table(variants: &[VariantOutput]) -> String {
    let rows = variants.iter().map(|v| {
        vec![
            format_map(&v.entries, ':'),
            truncate(&format_map(&v.values, '='), 60),
        ]
    });
    table(&["LABELS", "VALUES"], rows)
}

impl CommandOutput for GroupOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Group: {}", self.id),
            format!("Version: {}", self.version),
            format!("Variants: {}", self.configs.len()),
        ];
        if !self.configs.is_empty() {
            lines.push(variant_table(&self.configs));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct GroupListOutput {
    pub groups: Vec<GroupOutput>,
    pub total: usize,
}

impl From<Vec<Group>> for GroupListOutput {
    fn from(groups: Vec<Group>) -> Self {
        Self {
            total: groups.len(),
            groups: groups.into_iter().map(GroupOutput::from).collect(),
        }
    }
}

impl CommandOutput for GroupListOutput {
    fn to_human(&self) -> String {
        if self.groups.is_empty() {
            return "No groups found.".to_string();
        }

        let rows = self
            .groups
            .iter()
            .map(|g| vec![g.id.clone(), g.version.clone(), g.configs.len().to_string()]);
        format!("Found {} group(s):\n{}", self.total, table(&["ID", "VERSION", "VARIANTS"], rows))
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct SelectOutput {
    pub id: String,
    pub version: String,
    pub labels: String,
    pub matches: Vec<VariantOutput>,
}

impl CommandOutput for SelectOutput {
    fn to_human(&self) -> String {
        if self.matches.is_empty() {
            return format!("No variants of {}/{} match '{}'.", self.id, self.version, self.labels);
        }
        format!("{} matching variant(s):\n{}", self.matches.len(), variant_table(&self.matches))
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct GroupActionOutput {
    pub success: bool,
    pub message: String,
    pub group: Option<GroupOutput>,
}

impl CommandOutput for GroupActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn written(message: &str, group: Group) -> GroupActionOutput {
    GroupActionOutput {
        success: true,
        message: format!("{message}: {} (version {})", group.id, group.version),
        group: Some(GroupOutput::from(group)),
    }
}

pub async fn execute(args: GroupArgs, settings: &Settings, json_mode: bool) -> Result<()> {
    let store = open_store(settings).await?;
    run(&store, args.command, json_mode).await
}

async fn run(store: &CliStore, command: GroupCommands, json_mode: bool) -> Result<()> {
    match command {
        GroupCommands::Add { file, version } => {
            let mut group: Group = read_json_file(&file).await?;
            group.id = String::new();
            if let Some(version) = version {
                group.version = version;
            }

            let group = store.add_config_group(group).await.context("Failed to add group")?;
            output(&written("Group created", group), json_mode);
        }

        GroupCommands::Version { id, file, version } => {
            let mut group: Group = read_json_file(&file).await?;
            group.id = id;
            if let Some(version) = version {
                group.version = version;
            }

            let group = store
                .add_config_group_version(group)
                .await
                .context("Failed to add group version")?;
            output(&written("Group version written", group), json_mode);
        }

        GroupCommands::Update { id, version, file } => {
            let mut group: Group = read_json_file(&file).await?;
            group.id = id;
            group.version = version;

            let group = store.update_config_group(group).await.context("Failed to update group")?;
            output(&written("Group updated", group), json_mode);
        }

        GroupCommands::Get { id, version } => {
            let group = store.get_config_group(&id, &version).await?;
            output(&GroupOutput::from(group), json_mode);
        }

        GroupCommands::Versions { id } => {
            let groups = store.get_config_group_versions(&id).await?;
            output(&GroupListOutput::from(groups), json_mode);
        }

        GroupCommands::List => {
            let groups = store.get_all_groups().await?;
            output(&GroupListOutput::from(groups), json_mode);
        }

        GroupCommands::Delete { id, version } => {
            store.delete_config_group(&id, &version).await?;

            let out = GroupActionOutput {
                success: true,
                message: format!("Group deleted: {id} (version {version})"),
                group: None,
            };
            output(&out, json_mode);
        }

        GroupCommands::Select { id, version, labels } => {
            let matches = store.get_configs_by_labels(&id, &version, &labels).await?;

            let out = SelectOutput {
                id,
                version,
                labels,
                matches: matches.into_iter().map(VariantOutput::from).collect(),
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
