//! CLI command implementations.

pub mod config;
pub mod group;
pub mod init;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::adapters::sqlite::{initialize_database, PoolConfig, SqliteKvStore};
use crate::adapters::InMemoryKvStore;
use crate::domain::models::{BackendKind, Settings};
use crate::domain::ports::KvStore;
use crate::services::ConfigStore;

/// Store over whichever backend the settings select.
pub type CliStore = ConfigStore<dyn KvStore>;

pub async fn open_store(settings: &Settings) -> Result<CliStore> {
    let backend: Arc<dyn KvStore> = match settings.backend.kind {
        BackendKind::Sqlite => {
            let url = &settings.backend.database_url;
            let pool = initialize_database(url, Some(PoolConfig::from(&settings.backend)))
                .await
                .with_context(|| format!("Failed to open database at {url}. Run 'confstore init' first."))?;
            Arc::new(SqliteKvStore::new(pool))
        }
        BackendKind::Memory => {
            tracing::warn!("memory backend selected; records are discarded when the process exits");
            Arc::new(InMemoryKvStore::new())
        }
    };

    Ok(ConfigStore::new(backend))
}

/// Parse repeated `key=value` arguments. Later keys replace earlier ones.
pub fn parse_entries(pairs: &[String]) -> Result<BTreeMap<String, String>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| anyhow::anyhow!("Invalid entry '{pair}': expected key=value"))
        })
        .collect()
}

pub async fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}
