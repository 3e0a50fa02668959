//! [`KvStore`] over the `project_kv` table.
//!
//! Writes are upserts (last writer wins). Prefix listing uses an escaped
//! `LIKE` so the `_` separators in keys match literally.

use async_trait::async_trait;
use roomify_core::kv::{KvEntry, KvError, KvStore};
use serde_json::Value;

use crate::DbPool;

/// Postgres-backed key-value store.
#[derive(Debug, Clone)]
pub struct PgKvStore {
    pool: DbPool,
}

impl PgKvStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn backend(err: sqlx::Error) -> KvError {
    tracing::error!(error = %err, "project_kv query failed");
    KvError::Backend(err.to_string())
}

/// Build a `LIKE` pattern matching keys that start with `prefix` literally.
fn like_prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl KvStore for PgKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, KvError> {
        let row: Option<(Value,)> = sqlx::query_as("SELECT value FROM project_kv WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        Ok(row.map(|(v,)| v))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), KvError> {
        sqlx::query(
            "INSERT INTO project_kv (key, value) VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
        )
        .bind(key)
        .bind(&value)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<KvEntry>, KvError> {
        let rows: Vec<(String, Value)> = sqlx::query_as(
            "SELECT key, value FROM project_kv WHERE key LIKE $1 ESCAPE '\\' ORDER BY key",
        )
        .bind(like_prefix_pattern(prefix))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows
            .into_iter()
            .map(|(key, value)| KvEntry { key, value })
            .collect())
    }

    async fn ping(&self) -> Result<(), KvError> {
        crate::health_check(&self.pool).await.map_err(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_escapes_underscores() {
        assert_eq!(like_prefix_pattern("ns_u1_"), "ns\\_u1\\_%");
    }

    #[test]
    fn pattern_escapes_percent_and_backslash() {
        assert_eq!(like_prefix_pattern("a%b\\"), "a\\%b\\\\%");
    }
}
