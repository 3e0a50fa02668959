use std::sync::Arc;

use roomify_core::kv::KvStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Backing store for every user's projects.
    pub store: Arc<dyn KvStore>,
    pub config: Arc<ServerConfig>,
}
