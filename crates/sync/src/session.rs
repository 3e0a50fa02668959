//! Upload, render and load flows on top of the coordinator and reader.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use roomify_core::project::{Project, ProjectDraft, Visibility};
use roomify_core::render::RenderService;
use tokio_util::sync::CancellationToken;

use crate::coordinator::ProjectSyncCoordinator;
use crate::reader::ProjectReader;

pub struct VisualizerSession {
    coordinator: Arc<ProjectSyncCoordinator>,
    reader: Arc<ProjectReader>,
    render: Option<Arc<dyn RenderService>>,
    creating: AtomicBool,
}

/// Clears the in-flight flag when the creation future completes or is dropped.
struct CreatingGuard<'a>(&'a AtomicBool);

impl Drop for CreatingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl VisualizerSession {
    pub fn new(
        coordinator: Arc<ProjectSyncCoordinator>,
        reader: Arc<ProjectReader>,
        render: Option<Arc<dyn RenderService>>,
    ) -> Self {
        Self {
            coordinator,
            reader,
            render,
            creating: AtomicBool::new(false),
        }
    }

    pub fn coordinator(&self) -> &ProjectSyncCoordinator {
        &self.coordinator
    }

    pub fn reader(&self) -> &ProjectReader {
        &self.reader
    }

    /// Create a private project from an uploaded floor plan.
    ///
    /// Returns `None` without saving when another creation on this session
    /// is still running.
    pub async fn create_from_upload(&self, source_image: &str) -> Option<Project> {
        if self
            .creating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Project creation already in progress");
            return None;
        }
        let _guard = CreatingGuard(&self.creating);

        let now = Utc::now().timestamp_millis();
        let draft = ProjectDraft {
            id: Some(now.to_string()),
            name: Some(format!("Residence {now}")),
            source_image: Some(source_image.to_string()),
            timestamp: Some(now),
            ..Default::default()
        };

        self.coordinator.save(draft, Visibility::Private).await
    }

    /// Render the project's floor plan and save the result onto it.
    ///
    /// Returns `None` when the project, its source or the renderer is
    /// unavailable, or when rendering fails. The stored project is left as it
    /// was in those cases.
    pub async fn render(&self, id: &str) -> Option<Project> {
        let Some(render) = &self.render else {
            tracing::warn!(project_id = id, "No render service configured");
            return None;
        };
        let project = self.reader.get_by_id(id).await?;
        let Some(source) = project.source_image.clone() else {
            tracing::warn!(project_id = id, "Project has no source image to render");
            return None;
        };

        let output = match render.generate(&source).await {
            Ok(output) => output,
            Err(e) => {
                tracing::error!(project_id = id, error = %e, "Render failed");
                return None;
            }
        };

        let visibility = project.visibility;
        let mut draft = ProjectDraft::from(project);
        draft.rendered_image = Some(output.rendered_image);
        draft.rendered_path = output.rendered_path;
        self.coordinator.save(draft, visibility).await
    }

    /// Load a project for display. The result is discarded when `liveness`
    /// was cancelled while the read was in flight.
    pub async fn load(&self, id: &str, liveness: &CancellationToken) -> Option<Project> {
        let project = self.reader.get_by_id(id).await;
        if liveness.is_cancelled() {
            tracing::debug!(project_id = id, "Viewer gone, discarding loaded project");
            return None;
        }
        project
    }
}
