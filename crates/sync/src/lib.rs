//! Client-side project persistence.
//!
//! Saves go through [`ProjectSyncCoordinator`]: images are hosted first, the
//! record is cached locally, then mirrored to the remote project service when
//! one is configured. Reads go through [`ProjectReader`], preferring the
//! remote store and falling back to the local cache.
//!
//! Remote failures never surface to callers; they degrade to local-only
//! behaviour with a logged warning.

pub mod config;
pub mod coordinator;
pub mod file_kv;
pub mod hosting;
pub mod local;
pub mod reader;
pub mod remote;
pub mod render;
pub mod session;

use std::sync::Arc;

use roomify_core::auth::AuthProvider;
use roomify_core::hosting::{HostingBackend, HostingConfigProvider};
use roomify_core::kv::KvStore;
use roomify_core::render::RenderService;

pub use config::SyncConfig;
pub use coordinator::ProjectSyncCoordinator;
pub use local::LocalProjectCache;
pub use reader::ProjectReader;
pub use remote::RemoteProjectClient;
pub use session::VisualizerSession;

/// Collaborators the sync layer is wired to.
#[derive(Clone)]
pub struct Collaborators {
    pub local_store: Arc<dyn KvStore>,
    pub hosting: Arc<dyn HostingBackend>,
    pub hosting_config: Arc<dyn HostingConfigProvider>,
    pub auth: Arc<dyn AuthProvider>,
    pub render: Option<Arc<dyn RenderService>>,
}

/// Wire a [`VisualizerSession`] (and the coordinator/reader under it) from
/// configuration and collaborators. Without an explicit renderer, one is
/// built for `config.render_url` when that is set.
pub fn build_session(config: &SyncConfig, deps: Collaborators) -> VisualizerSession {
    let local = LocalProjectCache::new(deps.local_store);
    if !config.remote_configured() {
        tracing::info!("No project service configured, projects stay in the local cache");
    }
    let remote = config
        .worker_url
        .as_deref()
        .map(|url| RemoteProjectClient::new(url, Arc::clone(&deps.auth)));

    let coordinator = ProjectSyncCoordinator::new(
        deps.hosting_config,
        deps.hosting,
        local.clone(),
        remote.clone(),
        deps.auth,
    );
    let reader = ProjectReader::new(local, remote);

    let render = deps.render.or_else(|| {
        config
            .render_url
            .as_deref()
            .map(|url| Arc::new(render::HttpRenderService::new(url)) as Arc<dyn RenderService>)
    });

    VisualizerSession::new(Arc::new(coordinator), Arc::new(reader), render)
}
