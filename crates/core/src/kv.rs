//! Key-value storage primitive shared by the local cache and the remote store.
//!
//! Both sides are last-writer-wins: `set` overwrites unconditionally and no
//! version is checked.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

/// Errors surfaced by a [`KvStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    /// The backend is unreachable or refused the operation.
    #[error("KV backend error: {0}")]
    Backend(String),

    /// A stored or outgoing value could not be (de)serialized.
    #[error("KV serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem failure in a file-backed store.
    #[error("KV I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One listed entry.
#[derive(Debug, Clone, PartialEq)]
pub struct KvEntry {
    pub key: String,
    pub value: Value,
}

/// Minimal async key-value store.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read a value, `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<Value>, KvError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: Value) -> Result<(), KvError>;

    /// All entries whose key starts with `prefix`, ordered by key.
    async fn list(&self, prefix: &str) -> Result<Vec<KvEntry>, KvError>;

    /// Confirm the backend is reachable. In-process stores always are.
    async fn ping(&self) -> Result<(), KvError> {
        Ok(())
    }
}

/// In-process [`KvStore`] backed by an ordered map.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, KvError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), KvError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<KvEntry>, KvError> {
        let entries = self.entries.read().await;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| KvEntry {
                key: k.clone(),
                value: v.clone(),
            })
            .collect())
    }
}
