//! Image hosting backends.
//!
//! - [`local`] -- files under a directory served at a public base URL.
//! - [`s3`] -- objects in an S3-compatible bucket.
//!
//! [`connect`] builds the configured backend from [`HostingSettings`].

pub mod fetch;
pub mod local;
pub mod s3;
pub mod settings;

use std::sync::Arc;

use roomify_core::hosting::{HostingBackend, HostingConfigProvider};

pub use settings::{HostingBackendType, HostingSettings};

/// A hosting backend paired with the provider of its site configuration.
#[derive(Clone)]
pub struct HostingSite {
    pub backend: Arc<dyn HostingBackend>,
    pub config: Arc<dyn HostingConfigProvider>,
}

/// Build the backend selected by `settings`.
pub async fn connect(settings: &HostingSettings) -> HostingSite {
    match settings.backend_type {
        HostingBackendType::Local => {
            let hosting = Arc::new(local::LocalFsHosting::new(
                settings.root.clone().unwrap_or_default(),
                &settings.public_base_url,
            ));
            HostingSite {
                backend: hosting.clone(),
                config: hosting,
            }
        }
        HostingBackendType::S3 => {
            let hosting = Arc::new(s3::S3Hosting::connect(settings).await);
            HostingSite {
                backend: hosting.clone(),
                config: hosting,
            }
        }
    }
}
