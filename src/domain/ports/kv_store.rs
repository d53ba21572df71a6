//! Key-value backend port.

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a key-value backend.
#[derive(Debug, Error)]
pub enum KvError {
    #[error("Backend connection failed: {0}")]
    Connection(String),

    #[error("Backend operation failed: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for KvError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                KvError::Connection(err.to_string())
            }
            other => KvError::Backend(other.to_string()),
        }
    }
}

/// One entry returned by a prefix scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvPair {
    pub key: String,
    pub value: Vec<u8>,
}

/// The four primitives the store needs from a backend.
///
/// Keys are UTF-8 over a flat namespace; `/` is only a naming convention.
/// Writes to a single key are last-writer-wins.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read one key. `Ok(None)` when absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError>;

    /// Create or replace the value at `key`.
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), KvError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), KvError>;

    /// Every pair whose key starts with `prefix`, byte-wise.
    async fn list(&self, prefix: &str) -> Result<Vec<KvPair>, KvError>;
}
