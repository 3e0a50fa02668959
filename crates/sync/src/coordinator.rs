//! Create/update orchestration: hosting, local write, remote mirror.
//!
//! `save` returns `None` only when no viable record exists: missing id,
//! unavailable hosting site, or a source image that could not be hosted.
//! Everything after the local write is best effort.

use std::sync::Arc;

use chrono::Utc;
use roomify_core::auth::AuthProvider;
use roomify_core::hosting::{HostingBackend, HostingConfigProvider};
use roomify_core::image::ImageLabel;
use roomify_core::project::{validate_project_id, Project, ProjectDraft, Visibility};

use crate::hosting::{HostingResolver, LazyHostingConfig};
use crate::local::LocalProjectCache;
use crate::remote::RemoteProjectClient;

pub struct ProjectSyncCoordinator {
    hosting_config: LazyHostingConfig,
    resolver: HostingResolver,
    local: LocalProjectCache,
    /// `None` means remote mirroring is disabled, not failing.
    remote: Option<RemoteProjectClient>,
    auth: Arc<dyn AuthProvider>,
}

impl ProjectSyncCoordinator {
    pub fn new(
        hosting_config: Arc<dyn HostingConfigProvider>,
        hosting: Arc<dyn HostingBackend>,
        local: LocalProjectCache,
        remote: Option<RemoteProjectClient>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            hosting_config: LazyHostingConfig::new(hosting_config),
            resolver: HostingResolver::new(hosting),
            local,
            remote,
            auth,
        }
    }

    /// Persist `item`, returning the record callers should display.
    pub async fn save(&self, item: ProjectDraft, visibility: Visibility) -> Option<Project> {
        let Some(raw_id) = item.id.as_deref() else {
            tracing::warn!("Refusing to save project without an id");
            return None;
        };
        let id = match validate_project_id(raw_id) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, "Refusing to save project with invalid id");
                return None;
            }
        };

        let hosting = match self.hosting_config.get().await {
            Ok(h) => h,
            Err(e) => {
                tracing::error!(project_id = %id, error = %e, "Hosting site unavailable, project not saved");
                return None;
            }
        };

        let Some(source) = item.source_image.as_deref() else {
            tracing::error!(project_id = %id, "Project has no source image, not saved");
            return None;
        };
        let Some(source_url) = self
            .resolver
            .resolve(&hosting, source, &id, ImageLabel::Source)
            .await
        else {
            tracing::error!(project_id = %id, "Source image could not be hosted, project not saved");
            return None;
        };

        let rendered_url = match item.rendered_image.as_deref() {
            Some(render) => {
                let url = self
                    .resolver
                    .resolve(&hosting, render, &id, ImageLabel::Rendered)
                    .await;
                if url.is_none() {
                    tracing::warn!(project_id = %id, "Render could not be hosted, saving without it");
                }
                url
            }
            None => None,
        };

        let owner_id = match item.owner_id {
            Some(owner) => Some(owner),
            None => self.auth.current_user_id().await,
        };

        let payload = Project {
            id,
            name: item.name,
            source_image: Some(source_url),
            rendered_image: rendered_url,
            owner_id,
            visibility,
            timestamp: item.timestamp,
            updated_at: Some(Utc::now()),
        };

        if let Err(e) = self.local.write(&payload).await {
            tracing::warn!(project_id = %payload.id, error = %e, "Local project cache write failed");
        }

        let Some(remote) = &self.remote else {
            return Some(payload);
        };

        // The remote store never holds image sources; they are reattached
        // from the hosted payload.
        match remote.save(&payload.without_source(), visibility).await {
            Ok(stored) if stored.id == payload.id => {
                let merged = reconcile(stored, &payload);
                if let Err(e) = self.local.write(&merged).await {
                    tracing::warn!(project_id = %merged.id, error = %e, "Local project cache refresh failed");
                }
                Some(merged)
            }
            Ok(stored) => {
                tracing::warn!(
                    project_id = %payload.id,
                    returned_id = %stored.id,
                    "Remote returned a different project, keeping local copy"
                );
                Some(payload)
            }
            Err(e) => {
                tracing::warn!(project_id = %payload.id, error = %e, "Remote mirror failed, saved locally only");
                Some(payload)
            }
        }
    }
}

/// Remote record with the hosted images the remote store does not keep.
fn reconcile(mut stored: Project, local: &Project) -> Project {
    if stored.source_image.is_none() {
        stored.source_image = local.source_image.clone();
    }
    if stored.rendered_image.is_none() {
        stored.rendered_image = local.rendered_image.clone();
    }
    stored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> Project {
        Project {
            id: id.into(),
            name: None,
            source_image: None,
            rendered_image: None,
            owner_id: None,
            visibility: Visibility::Private,
            timestamp: None,
            updated_at: None,
        }
    }

    #[test]
    fn reconcile_keeps_remote_fields_and_restores_images() {
        let mut local = record("p1");
        local.source_image = Some("https://h/s.png".into());
        local.rendered_image = Some("https://h/r.png".into());
        local.name = Some("local".into());

        let mut stored = record("p1");
        stored.name = Some("remote".into());
        stored.updated_at = Some(Utc::now());

        let merged = reconcile(stored.clone(), &local);
        assert_eq!(merged.name.as_deref(), Some("remote"));
        assert_eq!(merged.updated_at, stored.updated_at);
        assert_eq!(merged.source_image.as_deref(), Some("https://h/s.png"));
        assert_eq!(merged.rendered_image.as_deref(), Some("https://h/r.png"));
    }
}
