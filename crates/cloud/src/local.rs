//! Hosting on the local filesystem, served by a static file server at a
//! public base URL.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use roomify_core::hosting::{
    HostedObject, HostingBackend, HostingConfig, HostingConfigProvider, HostingError, UploadSource,
};

use crate::fetch::materialize;

/// Writes hosted images below `root`; `root/<path>` is served at
/// `<public_base_url>/<path>`.
#[derive(Debug, Clone)]
pub struct LocalFsHosting {
    root: PathBuf,
    config: HostingConfig,
    client: reqwest::Client,
}

impl LocalFsHosting {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            config: HostingConfig::new(public_base_url),
            client: reqwest::Client::new(),
        }
    }

    /// Resolve a hosted path below the root, refusing escapes.
    fn target(&self, path: &str) -> Result<PathBuf, HostingError> {
        let relative = Path::new(path.trim_start_matches('/'));
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || relative.as_os_str().is_empty() {
            return Err(HostingError::Upload(format!("refusing hosted path '{path}'")));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl HostingBackend for LocalFsHosting {
    async fn upload(&self, source: UploadSource, path: &str) -> Result<HostedObject, HostingError> {
        let target = self.target(path)?;
        let image = materialize(&self.client, source).await?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| HostingError::Upload(e.to_string()))?;
        }
        tokio::fs::write(&target, &image.data)
            .await
            .map_err(|e| HostingError::Upload(e.to_string()))?;

        tracing::debug!(path, bytes = image.data.len(), "Hosted image on local filesystem");
        Ok(HostedObject {
            url: self.config.url_for(path),
        })
    }
}

#[async_trait]
impl HostingConfigProvider for LocalFsHosting {
    /// Creates the hosting root on first use.
    async fn get_or_create(&self) -> Result<HostingConfig, HostingError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| HostingError::Config(format!("{}: {e}", self.root.display())))?;
        Ok(self.config.clone())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn upload_writes_file_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let hosting = LocalFsHosting::new(dir.path(), "http://files.local/");

        let hosted = hosting
            .upload(
                UploadSource::Bytes {
                    data: b"png".to_vec(),
                    content_type: "image/png".into(),
                },
                "roomify/sources/p1.png",
            )
            .await
            .unwrap();

        assert_eq!(hosted.url, "http://files.local/roomify/sources/p1.png");
        let written = std::fs::read(dir.path().join("roomify/sources/p1.png")).unwrap();
        assert_eq!(written, b"png");
    }

    #[tokio::test]
    async fn same_path_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let hosting = LocalFsHosting::new(dir.path(), "http://files.local");
        for body in [b"one".to_vec(), b"two".to_vec()] {
            hosting
                .upload(
                    UploadSource::Bytes {
                        data: body,
                        content_type: "image/png".into(),
                    },
                    "roomify/sources/p1.png",
                )
                .await
                .unwrap();
        }
        let written = std::fs::read(dir.path().join("roomify/sources/p1.png")).unwrap();
        assert_eq!(written, b"two");
    }

    #[tokio::test]
    async fn rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let hosting = LocalFsHosting::new(dir.path(), "http://files.local");
        let result = hosting
            .upload(
                UploadSource::Bytes {
                    data: b"x".to_vec(),
                    content_type: "image/png".into(),
                },
                "../escape.png",
            )
            .await;
        assert_matches!(result, Err(HostingError::Upload(_)));
    }

    #[tokio::test]
    async fn get_or_create_makes_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("site");
        let hosting = LocalFsHosting::new(&root, "http://files.local");

        let config = hosting.get_or_create().await.unwrap();
        assert_eq!(config.public_base_url, "http://files.local");
        assert!(root.is_dir());
    }
}
