//! Versioned storage of configs and config groups over a KvStore backend.
//!
//! Each `(kind, id, version)` is one backend key holding the full record as
//! JSON. Writes replace the whole record. Version-add and update never check
//! for an existing value; only group creation does.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::errors::{InvalidInputError, StoreError, StoreResult};
use crate::domain::keys::{self, EntityKind};
use crate::domain::models::{Config, ConfigForGroup, Group};
use crate::domain::ports::KvStore;
use crate::services::label_matcher::{parse_label_query, select_matching};

/// Source of ids for newly created entities.
pub type IdGenerator = Arc<dyn Fn() -> String + Send + Sync>;

pub struct ConfigStore<K: KvStore + ?Sized> {
    backend: Arc<K>,
    new_id: IdGenerator,
}

impl<K: KvStore + ?Sized> Clone for ConfigStore<K> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            new_id: Arc::clone(&self.new_id),
        }
    }
}

impl<K: KvStore + ?Sized> ConfigStore<K> {
    pub fn new(backend: Arc<K>) -> Self {
        Self {
            backend,
            new_id: Arc::new(keys::new_id),
        }
    }

    /// Replace the random UUID source.
    pub fn with_id_generator(mut self, generator: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.new_id = Arc::new(generator);
        self
    }

    pub fn backend(&self) -> &Arc<K> {
        &self.backend
    }

    // ------------------------------------------------------------------
    // Configs
    // ------------------------------------------------------------------

    /// Store the first version of a new config under a freshly minted id.
    pub async fn add_config(&self, mut config: Config) -> StoreResult<Config> {
        require_version(&config.version)?;

        config.id = (self.new_id)();
        self.write_record(EntityKind::Config, &config.id, &config.version, &config)
            .await?;

        tracing::info!(id = %config.id, version = %config.version, "config created");
        Ok(config)
    }

    /// Write `config` at its `(id, version)`, replacing whatever is there.
    pub async fn add_config_version(&self, config: Config) -> StoreResult<Config> {
        require_id(&config.id)?;
        require_version(&config.version)?;

        self.write_record(EntityKind::Config, &config.id, &config.version, &config)
            .await?;

        tracing::info!(id = %config.id, version = %config.version, "config version written");
        Ok(config)
    }

    pub async fn get_config(&self, id: &str, version: &str) -> StoreResult<Config> {
        self.read_record(EntityKind::Config, id, version).await
    }

    /// Every stored version of one config, in backend order.
    pub async fn get_config_versions(&self, id: &str) -> StoreResult<Vec<Config>> {
        self.list_records(EntityKind::Config, &keys::entity_prefix(EntityKind::Config, id))
            .await
    }

    /// Every version of every config.
    pub async fn get_all_configs(&self) -> StoreResult<Vec<Config>> {
        self.list_records(EntityKind::Config, &keys::kind_prefix(EntityKind::Config))
            .await
    }

    pub async fn delete_config(&self, id: &str, version: &str) -> StoreResult<()> {
        self.delete_record(EntityKind::Config, id, version).await
    }

    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    /// Store the first version of a new group. Fails with `AlreadyExists` if
    /// the minted key is somehow already taken.
    pub async fn add_config_group(&self, mut group: Group) -> StoreResult<Group> {
        require_version(&group.version)?;
        if group.configs.is_none() {
            return Err(InvalidInputError::MissingField("configs").into());
        }

        group.id = (self.new_id)();
        let key = keys::build_key(EntityKind::Group, &group.id, &group.version);
        if self.backend.get(&key).await?.is_some() {
            tracing::warn!(%key, "group key collision on create");
            return Err(StoreError::AlreadyExists {
                kind: EntityKind::Group,
                id: group.id,
                version: group.version,
            });
        }

        self.write_record(EntityKind::Group, &group.id, &group.version, &group)
            .await?;

        tracing::info!(
            id = %group.id,
            version = %group.version,
            variants = group.configs().len(),
            "group created"
        );
        Ok(group)
    }

    /// Write `group` at its `(id, version)`, replacing whatever is there.
    pub async fn add_config_group_version(&self, group: Group) -> StoreResult<Group> {
        self.overwrite_group(group, "group version written").await
    }

    /// Replace the record at `(group.id, group.version)` wholesale. Nothing
    /// from the previous record is kept.
    pub async fn update_config_group(&self, group: Group) -> StoreResult<Group> {
        self.overwrite_group(group, "group replaced").await
    }

    pub async fn get_config_group(&self, id: &str, version: &str) -> StoreResult<Group> {
        self.read_record(EntityKind::Group, id, version).await
    }

    /// Every stored version of one group, in backend order.
    pub async fn get_config_group_versions(&self, id: &str) -> StoreResult<Vec<Group>> {
        self.list_records(EntityKind::Group, &keys::entity_prefix(EntityKind::Group, id))
            .await
    }

    /// Every version of every group.
    pub async fn get_all_groups(&self) -> StoreResult<Vec<Group>> {
        self.list_records(EntityKind::Group, &keys::kind_prefix(EntityKind::Group))
            .await
    }

    pub async fn delete_config_group(&self, id: &str, version: &str) -> StoreResult<()> {
        self.delete_record(EntityKind::Group, id, version).await
    }

    /// Variants of group `(id, version)` whose label set equals `labels`
    /// exactly. The query is parsed before the group is read, so a malformed
    /// query never touches the backend.
    pub async fn get_configs_by_labels(
        &self,
        id: &str,
        version: &str,
        labels: &str,
    ) -> StoreResult<Vec<ConfigForGroup>> {
        let query = parse_label_query(labels)?;
        let group: Group = self.read_record(EntityKind::Group, id, version).await?;

        let matches = select_matching(&group, &query);
        tracing::debug!(%id, %version, labels = %query, matches = matches.len(), "label selection");
        Ok(matches)
    }

    // ------------------------------------------------------------------
    // Record plumbing
    // ------------------------------------------------------------------

    async fn overwrite_group(&self, group: Group, message: &'static str) -> StoreResult<Group> {
        require_id(&group.id)?;
        require_version(&group.version)?;

        self.write_record(EntityKind::Group, &group.id, &group.version, &group)
            .await?;

        tracing::info!(id = %group.id, version = %group.version, "{message}");
        Ok(group)
    }

    async fn write_record<T: Serialize + Sync>(
        &self,
        kind: EntityKind,
        id: &str,
        version: &str,
        record: &T,
    ) -> StoreResult<()> {
        let value = serde_json::to_vec(record)?;
        let key = keys::build_key(kind, id, version);
        self.backend.put(&key, value).await?;
        Ok(())
    }

    async fn read_record<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        id: &str,
        version: &str,
    ) -> StoreResult<T> {
        let key = keys::build_key(kind, id, version);
        let value = self
            .backend
            .get(&key)
            .await?
            .ok_or_else(|| StoreError::not_found(kind, id, version))?;

        Ok(serde_json::from_slice(&value)?)
    }

    async fn list_records<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        prefix: &str,
    ) -> StoreResult<Vec<T>> {
        let pairs = self.backend.list(&keys::scan_prefix(prefix)).await?;

        // Every pair under the prefix is a record of this kind, including
        // ones whose id or version contains the delimiter.
        let mut records = Vec::with_capacity(pairs.len());
        for pair in pairs {
            if keys::parse_key(&pair.key).is_none() {
                tracing::debug!(key = %pair.key, %kind, "record key has extra delimiters");
            }
            records.push(serde_json::from_slice(&pair.value)?);
        }

        tracing::debug!(%kind, %prefix, count = records.len(), "listed records");
        Ok(records)
    }

    async fn delete_record(&self, kind: EntityKind, id: &str, version: &str) -> StoreResult<()> {
        let key = keys::build_key(kind, id, version);
        if self.backend.get(&key).await?.is_none() {
            return Err(StoreError::not_found(kind, id, version));
        }

        self.backend.delete(&key).await?;
        tracing::info!(%kind, %id, %version, "record deleted");
        Ok(())
    }
}

fn require_id(id: &str) -> Result<(), InvalidInputError> {
    if id.is_empty() {
        return Err(InvalidInputError::MissingField("id"));
    }
    Ok(())
}

fn require_version(version: &str) -> Result<(), InvalidInputError> {
    if version.is_empty() {
        return Err(InvalidInputError::MissingField("version"));
    }
    Ok(())
}
