//! File-backed [`KvStore`] for the per-installation project cache.
//!
//! The whole map is kept in memory and rewritten on every `set` through a
//! temp file and rename, so a crash never leaves a half-written cache.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use roomify_core::kv::{KvEntry, KvError, KvStore};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::SyncConfig;

#[derive(Debug)]
pub struct FileKvStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, Value>>,
}

impl FileKvStore {
    /// Open the store at `path`, loading existing entries. A missing file is
    /// an empty store; an unreadable one is an error.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, KvError> {
        let path = path.into();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), entries = entries.len(), "Opened local project store");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Open the store at the configured `ROOMIFY_LOCAL_STORE` path.
    pub async fn open_configured(config: &SyncConfig) -> Result<Self, KvError> {
        Self::open(&config.local_store_path).await
    }

    async fn persist(&self, entries: &BTreeMap<String, Value>) -> Result<(), KvError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(entries)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, KvError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), KvError> {
        let mut entries = self.entries.lock().await;
        let previous = entries.insert(key.to_string(), value);
        if let Err(e) = self.persist(&entries).await {
            // Keep memory and disk in agreement.
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<KvEntry>, KvError> {
        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| KvEntry {
                key: k.clone(),
                value: v.clone(),
            })
            .collect())
    }
}
