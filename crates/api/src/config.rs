use roomify_core::keys::DEFAULT_NAMESPACE;

use crate::auth::jwt::JwtConfig;

/// Where the per-user project records live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process memory; records are lost on restart.
    Memory,
    /// The `project_kv` table at `DATABASE_URL`.
    Postgres { database_url: String },
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// First segment of every stored key (`{namespace}_{user}_{id}`).
    pub namespace: String,
    pub storage: StorageBackend,
    /// Bearer token validation settings.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `PROJECT_NAMESPACE`    | `architecture_visualizer`  |
    /// | `STORAGE_BACKEND`      | `memory` (or `postgres`)   |
    /// | `DATABASE_URL`         | required for `postgres`    |
    ///
    /// # Panics
    ///
    /// Panics on unparsable numbers, an unknown storage backend, or a
    /// `postgres` backend without `DATABASE_URL`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let namespace = std::env::var("PROJECT_NAMESPACE")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        let storage = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "memory".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => StorageBackend::Memory,
            "postgres" => StorageBackend::Postgres {
                database_url: std::env::var("DATABASE_URL")
                    .expect("DATABASE_URL must be set when STORAGE_BACKEND=postgres"),
            },
            other => panic!("Unknown STORAGE_BACKEND '{other}' (expected memory or postgres)"),
        };

        Self {
            host,
            port,
            request_timeout_secs,
            namespace,
            storage,
            jwt: JwtConfig::from_env(),
        }
    }
}
