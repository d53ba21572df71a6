//! Common test utilities for integration tests
//!
//! Shared store fixtures and record builders.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use confstore::adapters::sqlite::{create_migrated_test_pool, initialize_database};
use confstore::{Config, ConfigForGroup, ConfigStore, Group, InMemoryKvStore, SqliteKvStore};
use tempfile::TempDir;

/// Store over a fresh in-memory backend. The backend handle is returned too so
/// tests can inspect raw keys.
pub fn memory_store() -> (Arc<InMemoryKvStore>, ConfigStore<InMemoryKvStore>) {
    let backend = Arc::new(InMemoryKvStore::new());
    let store = ConfigStore::new(Arc::clone(&backend));
    (backend, store)
}

/// Store over a migrated in-memory `SQLite` database.
pub async fn sqlite_memory_store() -> ConfigStore<SqliteKvStore> {
    let pool = create_migrated_test_pool()
        .await
        .expect("Failed to create test pool");
    ConfigStore::new(Arc::new(SqliteKvStore::new(pool)))
}

/// Create a temporary test database
///
/// Returns the directory guard and the database URL inside it.
pub fn temp_db_url() -> (TempDir, String) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path: PathBuf = dir.path().join("test.db");
    let url = format!("sqlite:{}", db_path.display());
    (dir, url)
}

/// Store over a file-backed `SQLite` database at `url`.
pub async fn sqlite_file_store(url: &str) -> ConfigStore<SqliteKvStore> {
    let pool = initialize_database(url, None)
        .await
        .expect("Failed to initialize database");
    ConfigStore::new(Arc::new(SqliteKvStore::new(pool)))
}

pub fn sample_config(version: &str) -> Config {
    Config::new(version)
        .with_entry("host", "db.internal")
        .with_entry("port", "5432")
}

/// Group with two prod variants sharing a label set, plus one dev and one
/// multi-label variant.
pub fn sample_group(version: &str) -> Group {
    Group::new(version)
        .with_config(
            ConfigForGroup::new()
                .with_label("env", "prod")
                .with_value("replicas", "3"),
        )
        .with_config(
            ConfigForGroup::new()
                .with_label("env", "dev")
                .with_value("replicas", "1"),
        )
        .with_config(
            ConfigForGroup::new()
                .with_label("env", "prod")
                .with_label("region", "eu")
                .with_value("replicas", "5"),
        )
        .with_config(
            ConfigForGroup::new()
                .with_label("env", "prod")
                .with_value("replicas", "4"),
        )
}

/// Setup test logging
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
