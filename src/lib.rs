//! confstore - versioned configuration store
//!
//! Stores two kinds of versioned records over a pluggable key-value backend:
//! flat configs (a map of parameter names to values) and config groups (a list
//! of labelled variants, selected by exact label match).
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Records, key schema, errors and the `KvStore` port
//! - **Adapters** (`adapters`): In-memory and `SQLite` key-value backends
//! - **Service Layer** (`services`): `ConfigStore` and label matching
//! - **Infrastructure Layer** (`infrastructure`): Settings and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use confstore::{Config, ConfigStore, InMemoryKvStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = ConfigStore::new(Arc::new(InMemoryKvStore::new()));
//!     let config = store.add_config(Config::new("v1").with_entry("port", "8080")).await?;
//!     let loaded = store.get_config(&config.id, "v1").await?;
//!     assert_eq!(loaded.entries["port"], "8080");
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::{InMemoryKvStore, SqliteKvStore};
pub use domain::keys::EntityKind;
pub use domain::models::{Config, ConfigForGroup, Group, Settings};
pub use domain::ports::{KvError, KvPair, KvStore};
pub use domain::{InvalidInputError, StoreError, StoreResult};
pub use infrastructure::config::{SettingsError, SettingsLoader};
pub use services::{ConfigStore, LabelSet};
