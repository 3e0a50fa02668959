//! Per-installation cache of the last-known state of every project touched.

use std::sync::Arc;

use roomify_core::keys::local_project_key;
use roomify_core::kv::{KvError, KvStore};
use roomify_core::project::{Project, StoredProject};

/// Project records keyed `project:{id}`. There is no enumeration: the
/// cache only answers for ids the caller already knows.
#[derive(Clone)]
pub struct LocalProjectCache {
    store: Arc<dyn KvStore>,
}

impl LocalProjectCache {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Write `project` under its id, replacing any previous record.
    pub async fn write(&self, project: &Project) -> Result<(), KvError> {
        let value = serde_json::to_value(project)?;
        self.store.set(&local_project_key(&project.id), value).await
    }

    /// Read a project. Absent, malformed, or unreadable values yield `None`.
    pub async fn read(&self, id: &str) -> Option<Project> {
        let value = match self.store.get(&local_project_key(id)).await {
            Ok(Some(v)) => v,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(project_id = id, error = %e, "Local project cache read failed");
                return None;
            }
        };

        match StoredProject::from_value(value) {
            StoredProject::Valid(p) => Some(p),
            StoredProject::Invalid(reason) => {
                tracing::debug!(project_id = id, reason = %reason, "Ignoring malformed cached project");
                None
            }
        }
    }
}
