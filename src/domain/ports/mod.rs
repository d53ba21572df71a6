//! Port trait definitions (Hexagonal Architecture)
//!
//! The store depends only on these traits; adapters under `crate::adapters`
//! implement them for concrete backends.

pub mod kv_store;

pub use kv_store::{KvError, KvPair, KvStore};
