//! The client sync layer against a live instance of this service.

mod common;

use std::sync::Arc;

use roomify_cloud::HostingSettings;
use roomify_core::auth::StaticAuth;
use roomify_core::image::to_data_url;
use roomify_core::kv::KvStore;
use roomify_core::project::{ProjectDraft, Visibility};
use roomify_sync::file_kv::FileKvStore;
use roomify_sync::{build_session, Collaborators, SyncConfig, VisualizerSession};
use tokio::net::TcpListener;

const HOST_BASE: &str = "https://site.host.example";

/// Serve the app on an ephemeral port and return its base URL.
async fn spawn_server() -> (String, Arc<roomify_core::kv::MemoryKvStore>) {
    let (app, store) = common::build_test_app();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), store)
}

async fn session(worker_url: &str, dir: &tempfile::TempDir, user: &str) -> VisualizerSession {
    let hosted_root = dir.path().join("hosted");
    let store_path = dir.path().join("projects.json");
    let vars = [
        ("HOSTING_BACKEND", "local".to_string()),
        ("HOSTING_PUBLIC_URL", HOST_BASE.to_string()),
        ("HOSTING_ROOT", hosted_root.display().to_string()),
        ("ROOMIFY_WORKER_URL", format!("{worker_url}/")),
        ("ROOMIFY_LOCAL_STORE", store_path.display().to_string()),
    ];
    let lookup = |key: &str| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
    };

    let settings = HostingSettings::from_lookup(lookup).unwrap();
    let site = roomify_cloud::connect(&settings).await;
    let config = SyncConfig::from_lookup(lookup);
    let local_store = Arc::new(FileKvStore::open_configured(&config).await.unwrap());

    build_session(
        &config,
        Collaborators {
            local_store,
            hosting: site.backend,
            hosting_config: site.config,
            auth: Arc::new(StaticAuth::new(user, common::token_for(user))),
            render: None,
        },
    )
}

#[tokio::test]
async fn save_list_and_get_through_the_service() {
    let (url, server_store) = spawn_server().await;
    let dir = tempfile::tempdir().unwrap();
    let session = session(&url, &dir, "u1").await;

    let draft = ProjectDraft {
        id: Some("p1".into()),
        name: Some("Residence p1".into()),
        source_image: Some(to_data_url("image/png", b"plan")),
        ..Default::default()
    };
    let saved = session
        .coordinator()
        .save(draft, Visibility::Private)
        .await
        .expect("save should succeed");

    assert!(saved.source_image.as_deref().unwrap().starts_with(HOST_BASE));
    assert_eq!(saved.owner_id.as_deref(), Some("u1"));
    assert!(dir.path().join("hosted/roomify/sources/p1.png").exists());

    // Remote copy: stamped, without the source image.
    let remote = server_store
        .get("architecture_visualizer_u1_p1")
        .await
        .unwrap()
        .expect("remote record");
    assert!(remote.get("sourceImage").is_none());
    let stamped = saved
        .updated_at
        .map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Millis, true));
    assert_eq!(remote["updatedAt"].as_str(), stamped.as_deref());

    // Local copy carries the hosted source.
    let local = session.reader().get("p1").await.unwrap();
    assert_eq!(local.source_image, saved.source_image);

    let listed = session.reader().list().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].source_image, saved.source_image);

    let fetched = session.reader().get_by_id("p1").await.unwrap();
    assert_eq!(fetched, saved);
}

#[tokio::test]
async fn users_do_not_see_each_others_projects() {
    let (url, _) = spawn_server().await;
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let alice = session(&url, &dir_a, "alice").await;
    let bob = session(&url, &dir_b, "bob").await;

    let draft = ProjectDraft {
        id: Some("shared-id".into()),
        source_image: Some(to_data_url("image/png", b"plan")),
        ..Default::default()
    };
    alice.coordinator().save(draft, Visibility::Public).await.unwrap();

    assert_eq!(alice.reader().list().await.len(), 1);
    assert!(bob.reader().list().await.is_empty());
    assert!(bob.reader().get_by_id("shared-id").await.is_none());
}
