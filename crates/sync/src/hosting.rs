//! Resolution of project images to stable hosted URLs.

use std::sync::Arc;

use roomify_core::hosting::{
    HostingBackend, HostingConfig, HostingConfigProvider, HostingError, UploadSource,
};
use roomify_core::image::{hosted_path, ImageLabel, ImageRef};
use tokio::sync::OnceCell;

// ---------------------------------------------------------------------------
// Lazy hosting configuration
// ---------------------------------------------------------------------------

/// Caches the hosting site after the first successful lookup. A failed
/// lookup is not cached; the next call tries again.
pub struct LazyHostingConfig {
    provider: Arc<dyn HostingConfigProvider>,
    cell: OnceCell<HostingConfig>,
}

impl LazyHostingConfig {
    pub fn new(provider: Arc<dyn HostingConfigProvider>) -> Self {
        Self {
            provider,
            cell: OnceCell::new(),
        }
    }

    pub async fn get(&self) -> Result<HostingConfig, HostingError> {
        self.cell
            .get_or_try_init(|| async {
                let config = self.provider.get_or_create().await?;
                if config.public_base_url.is_empty() {
                    return Err(HostingError::Config("hosting site has no public URL".into()));
                }
                tracing::info!(base_url = %config.public_base_url, "Hosting site ready");
                Ok::<_, HostingError>(config)
            })
            .await
            .cloned()
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Maps embedded or foreign images to hosted URLs.
#[derive(Clone)]
pub struct HostingResolver {
    backend: Arc<dyn HostingBackend>,
}

impl HostingResolver {
    pub fn new(backend: Arc<dyn HostingBackend>) -> Self {
        Self { backend }
    }

    /// Resolve `image` to a hosted URL.
    ///
    /// Already-hosted URLs come back unchanged without touching the backend.
    /// Embedded data and foreign URLs are uploaded to the project's
    /// deterministic path for `label`. Returns `None` when the upload fails
    /// or yields no URL.
    pub async fn resolve(
        &self,
        hosting: &HostingConfig,
        image: &str,
        project_id: &str,
        label: ImageLabel,
    ) -> Option<String> {
        let image_ref = match ImageRef::classify(image, &hosting.public_base_url) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(project_id, label = label.as_str(), error = %e, "Unusable image reference");
                return None;
            }
        };

        let (source, path) = match image_ref {
            ImageRef::Hosted(url) => return Some(url),
            ImageRef::Embedded(img) => {
                let path = hosted_path(project_id, label, &img.content_type);
                let source = UploadSource::Bytes {
                    data: img.bytes,
                    content_type: img.content_type,
                };
                (source, path)
            }
            ImageRef::External(url) => {
                let path = hosted_path(project_id, label, content_type_from_url(&url));
                (UploadSource::Url(url), path)
            }
        };

        match self.backend.upload(source, &path).await {
            Ok(hosted) if !hosted.url.trim().is_empty() => {
                tracing::debug!(project_id, label = label.as_str(), url = %hosted.url, "Image hosted");
                Some(hosted.url)
            }
            Ok(_) => {
                tracing::warn!(project_id, label = label.as_str(), path = %path, "Hosting returned no URL");
                None
            }
            Err(e) => {
                tracing::warn!(project_id, label = label.as_str(), path = %path, error = %e, "Image hosting failed");
                None
            }
        }
    }
}

/// Guess an image MIME type from a URL's extension (`image/png` otherwise).
fn content_type_from_url(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or_default().to_ascii_lowercase();
    if path.ends_with(".jpg") || path.ends_with(".jpeg") {
        "image/jpeg"
    } else if path.ends_with(".webp") {
        "image/webp"
    } else {
        "image/png"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
