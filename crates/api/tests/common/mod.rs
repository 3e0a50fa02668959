#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use roomify_core::keys::DEFAULT_NAMESPACE;
use roomify_core::kv::{KvStore, MemoryKvStore};
use tower::ServiceExt;

use roomify_api::auth::jwt::{generate_access_token, JwtConfig};
use roomify_api::config::{ServerConfig, StorageBackend};
use roomify_api::router::build_app_router;
use roomify_api::state::AppState;

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults and in-memory storage.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        namespace: DEFAULT_NAMESPACE.to_string(),
        storage: StorageBackend::Memory,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router over `store`, with the same middleware
/// stack as production.
pub fn build_test_app_with(store: Arc<dyn KvStore>) -> Router {
    let config = test_config();
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Router over a fresh in-memory store, returned with the store for
/// inspection.
pub fn build_test_app() -> (Router, Arc<MemoryKvStore>) {
    let store = Arc::new(MemoryKvStore::new());
    (build_test_app_with(store.clone()), store)
}

/// Bearer token for `user_id` signed with the test secret.
pub fn token_for(user_id: &str) -> String {
    generate_access_token(user_id, &test_config().jwt).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<String>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder
        .body(body.map(Body::from).unwrap_or_else(Body::empty))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, token, Some(body.to_string())).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
