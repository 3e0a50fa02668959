use std::path::PathBuf;

/// Default location of the per-installation project cache.
pub const DEFAULT_LOCAL_STORE: &str = ".roomify/projects.json";

/// Client sync configuration.
///
/// Whether `worker_url` is set decides, once, whether remote mirroring and
/// remote reads are attempted at all.
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    /// Base URL of the remote project service, without trailing `/`.
    pub worker_url: Option<String>,
    /// File backing the local project cache.
    pub local_store_path: PathBuf,
    /// Endpoint of the render service.
    pub render_url: Option<String>,
}

impl SyncConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default                   |
    /// |-----------------------|---------------------------|
    /// | `ROOMIFY_WORKER_URL`  | unset (local-only)        |
    /// | `ROOMIFY_LOCAL_STORE` | `.roomify/projects.json`  |
    /// | `ROOMIFY_RENDER_URL`  | unset (rendering off)     |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let url = |key: &str| {
            lookup(key)
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            worker_url: url("ROOMIFY_WORKER_URL"),
            local_store_path: lookup("ROOMIFY_LOCAL_STORE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCAL_STORE)),
            render_url: url("ROOMIFY_RENDER_URL"),
        }
    }

    /// Local-only configuration.
    pub fn local_only(local_store_path: impl Into<PathBuf>) -> Self {
        Self {
            worker_url: None,
            local_store_path: local_store_path.into(),
            render_url: None,
        }
    }

    pub fn remote_configured(&self) -> bool {
        self.worker_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let config = SyncConfig::from_lookup(|key| {
            (key == "ROOMIFY_WORKER_URL").then(|| "https://worker.example/".to_string())
        });
        assert_eq!(config.worker_url.as_deref(), Some("https://worker.example"));
        assert!(config.remote_configured());
    }

    #[test]
    fn empty_worker_url_means_local_only() {
        let config = SyncConfig::from_lookup(|key| {
            (key == "ROOMIFY_WORKER_URL").then(|| "  ".to_string())
        });
        assert!(!config.remote_configured());
        assert_eq!(config.local_store_path, PathBuf::from(DEFAULT_LOCAL_STORE));
    }
}
