//! SQLite implementation of the KvStore port.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::domain::ports::{KvError, KvPair, KvStore};

#[derive(Clone)]
pub struct SqliteKvStore {
    pool: SqlitePool,
}

impl SqliteKvStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        let row: Option<(Vec<u8>,)> = sqlx::query_as("SELECT value FROM kv_pairs WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), KvError> {
        sqlx::query(
            r#"INSERT INTO kv_pairs (key, value, updated_at) VALUES (?, ?, ?)
               ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        sqlx::query("DELETE FROM kv_pairs WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<KvPair>, KvError> {
        // substr comparison instead of LIKE so '%' and '_' in keys stay literal
        let rows: Vec<KvRow> = sqlx::query_as(
            "SELECT key, value FROM kv_pairs WHERE substr(key, 1, length(?)) = ? ORDER BY key"
        )
        .bind(prefix)
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(KvPair::from).collect())
    }
}

#[derive(sqlx::FromRow)]
struct KvRow {
    key: String,
    value: Vec<u8>,
}

impl From<KvRow> for KvPair {
    fn from(row: KvRow) -> Self {
        Self {
            key: row.key,
            value: row.value,
        }
    }
}
