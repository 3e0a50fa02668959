//! Read orchestration: remote first when configured, local cache otherwise.

use roomify_core::project::{Project, StoredProject};

use crate::local::LocalProjectCache;
use crate::remote::RemoteProjectClient;

#[derive(Clone)]
pub struct ProjectReader {
    local: LocalProjectCache,
    remote: Option<RemoteProjectClient>,
}

impl ProjectReader {
    pub fn new(local: LocalProjectCache, remote: Option<RemoteProjectClient>) -> Self {
        Self { local, remote }
    }

    /// Local-cache read of `project:{id}`. The id is trimmed, as on save.
    pub async fn get(&self, id: &str) -> Option<Project> {
        self.local.read(id.trim()).await
    }

    /// Remote read with silent fallback to the local cache.
    pub async fn get_by_id(&self, id: &str) -> Option<Project> {
        let id = id.trim();
        if let Some(remote) = &self.remote {
            match remote.get(id).await {
                Ok(project) if project.id == id => return Some(self.with_local_images(project).await),
                Ok(project) => {
                    tracing::warn!(project_id = id, returned_id = %project.id, "Remote returned a different project");
                }
                Err(e) if e.is_not_found() => {
                    tracing::debug!(project_id = id, "Project not found remotely, trying local cache");
                }
                Err(e) => {
                    tracing::warn!(project_id = id, error = %e, "Remote read failed, using local cache");
                }
            }
        }
        self.local.read(id).await
    }

    /// Every project of the signed-in user. Remote-only: empty when no remote
    /// is configured or the remote call fails.
    pub async fn list(&self) -> Vec<Project> {
        let Some(remote) = &self.remote else {
            return Vec::new();
        };

        let values = match remote.list().await {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(error = %e, "Remote list failed");
                return Vec::new();
            }
        };

        let mut projects = Vec::with_capacity(values.len());
        for value in values {
            match StoredProject::from_value(value) {
                StoredProject::Valid(p) => projects.push(self.with_local_images(p).await),
                StoredProject::Invalid(reason) => {
                    tracing::debug!(reason = %reason, "Skipping malformed listed project");
                }
            }
        }
        projects
    }

    /// Fill images the remote store does not hold from the local cache.
    async fn with_local_images(&self, mut project: Project) -> Project {
        if project.source_image.is_some() && project.rendered_image.is_some() {
            return project;
        }
        if let Some(cached) = self.local.read(&project.id).await {
            if project.source_image.is_none() {
                project.source_image = cached.source_image;
            }
            if project.rendered_image.is_none() {
                project.rendered_image = cached.rendered_image;
            }
        }
        project
    }
}
