//! Shared collaborators for sync integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use roomify_core::auth::StaticAuth;
use roomify_core::hosting::{
    HostedObject, HostingBackend, HostingConfig, HostingConfigProvider, HostingError, UploadSource,
};
use roomify_core::image::{to_data_url, STORAGE_RENDERS};
use roomify_core::kv::{KvEntry, KvError, KvStore, MemoryKvStore};
use roomify_core::render::{RenderError, RenderOutput, RenderService};
use roomify_sync::{build_session, Collaborators, SyncConfig, VisualizerSession};
use serde_json::Value;
use tokio::sync::Notify;

pub const HOST_BASE: &str = "https://site.host.example";

pub fn plan_data_url() -> String {
    to_data_url("image/png", b"floor plan bytes")
}

// ---------------------------------------------------------------------------
// Hosting
// ---------------------------------------------------------------------------

/// Hosting backend that counts uploads and can be told to fail renders or
/// everything.
#[derive(Default)]
pub struct TestHosting {
    pub uploads: AtomicUsize,
    pub fail_all: bool,
    pub fail_renders: bool,
    /// When set, uploads wait for a notification before completing.
    pub gate: Option<Arc<Notify>>,
}

impl TestHosting {
    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostingBackend for TestHosting {
    async fn upload(&self, _source: UploadSource, path: &str) -> Result<HostedObject, HostingError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail_all || (self.fail_renders && path.starts_with(STORAGE_RENDERS)) {
            return Err(HostingError::Upload(format!("refused {path}")));
        }
        Ok(HostedObject {
            url: HostingConfig::new(HOST_BASE).url_for(path),
        })
    }
}

pub struct StaticHostingConfig(pub Option<&'static str>);

#[async_trait]
impl HostingConfigProvider for StaticHostingConfig {
    async fn get_or_create(&self) -> Result<HostingConfig, HostingError> {
        match self.0 {
            Some(base) => Ok(HostingConfig::new(base)),
            None => Err(HostingError::Config("no hosting site".into())),
        }
    }
}

// ---------------------------------------------------------------------------
// Local store
// ---------------------------------------------------------------------------

/// Store whose writes always fail.
pub struct BrokenKvStore;

#[async_trait]
impl KvStore for BrokenKvStore {
    async fn get(&self, _key: &str) -> Result<Option<Value>, KvError> {
        Err(KvError::Backend("unavailable".into()))
    }

    async fn set(&self, _key: &str, _value: Value) -> Result<(), KvError> {
        Err(KvError::Backend("unavailable".into()))
    }

    async fn list(&self, _prefix: &str) -> Result<Vec<KvEntry>, KvError> {
        Err(KvError::Backend("unavailable".into()))
    }
}

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------

/// Renderer returning a fixed embedded image, or failing.
pub struct StubRender {
    pub fail: bool,
}

#[async_trait]
impl RenderService for StubRender {
    async fn generate(&self, _source_image_url: &str) -> Result<RenderOutput, RenderError> {
        if self.fail {
            return Err(RenderError::Request("model overloaded".into()));
        }
        Ok(RenderOutput {
            rendered_image: to_data_url("image/png", b"render bytes"),
            rendered_path: Some("/tmp/render.png".into()),
        })
    }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

pub struct Harness {
    pub session: Arc<VisualizerSession>,
    pub store: Arc<MemoryKvStore>,
    pub hosting: Arc<TestHosting>,
}

pub fn sync_config(worker_url: Option<String>) -> SyncConfig {
    SyncConfig {
        worker_url,
        local_store_path: ".roomify/test.json".into(),
        render_url: None,
    }
}

/// Session against an in-memory local store, signed in as `u1`.
pub fn harness(worker_url: Option<String>, hosting: TestHosting) -> Harness {
    harness_with(worker_url, hosting, Some(HOST_BASE), None)
}

pub fn harness_with(
    worker_url: Option<String>,
    hosting: TestHosting,
    hosting_base: Option<&'static str>,
    render: Option<Arc<dyn RenderService>>,
) -> Harness {
    let store = Arc::new(MemoryKvStore::new());
    let hosting = Arc::new(hosting);
    let session = build_session(
        &sync_config(worker_url),
        Collaborators {
            local_store: store.clone(),
            hosting: hosting.clone(),
            hosting_config: Arc::new(StaticHostingConfig(hosting_base)),
            auth: Arc::new(StaticAuth::new("u1", "tok")),
            render,
        },
    );
    Harness {
        session: Arc::new(session),
        store,
        hosting,
    }
}
