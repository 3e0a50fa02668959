//! Image hosting collaborator seam.
//!
//! A [`HostingBackend`] turns bytes (or a foreign URL) into a stable public
//! URL. A [`HostingConfigProvider`] yields the caller's hosting site, creating
//! it on first use.

use async_trait::async_trait;

/// Errors from a hosting backend.
#[derive(Debug, thiserror::Error)]
pub enum HostingError {
    /// The hosting site could not be located or created.
    #[error("Hosting configuration unavailable: {0}")]
    Config(String),

    /// The upload itself failed.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Fetching a foreign URL for re-hosting failed.
    #[error("Fetch of {url} failed: {reason}")]
    Fetch { url: String, reason: String },
}

/// What to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSource {
    Bytes { data: Vec<u8>, content_type: String },
    Url(String),
}

/// Result of an upload. An empty `url` means the backend stored nothing
/// usable and is treated as a failure by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedObject {
    pub url: String,
}

/// The caller's hosting site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostingConfig {
    /// Public base URL; every hosted artifact lives under it.
    pub public_base_url: String,
}

impl HostingConfig {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        let base: String = public_base_url.into();
        Self {
            public_base_url: base.trim_end_matches('/').to_string(),
        }
    }

    /// Public URL of a hosted path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url, path.trim_start_matches('/'))
    }
}

/// Uploads images to a public host.
#[async_trait]
pub trait HostingBackend: Send + Sync {
    /// Store `source` at `path` and return its public URL. Writing the same
    /// path twice replaces the earlier artifact.
    async fn upload(&self, source: UploadSource, path: &str) -> Result<HostedObject, HostingError>;
}

/// Resolves (and lazily creates) the hosting site.
#[async_trait]
pub trait HostingConfigProvider: Send + Sync {
    async fn get_or_create(&self) -> Result<HostingConfig, HostingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_for_joins_without_double_slash() {
        let config = HostingConfig::new("https://h.example/");
        assert_eq!(config.url_for("/roomify/a.png"), "https://h.example/roomify/a.png");
        assert_eq!(config.url_for("roomify/a.png"), "https://h.example/roomify/a.png");
    }
}
