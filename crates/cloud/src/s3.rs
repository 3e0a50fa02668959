//! Hosting in an S3-compatible bucket fronted by a public base URL.

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use roomify_core::hosting::{
    HostedObject, HostingBackend, HostingConfig, HostingConfigProvider, HostingError, UploadSource,
};

use crate::fetch::materialize;
use crate::settings::HostingSettings;

/// Uploads hosted images as bucket objects keyed by their hosted path.
#[derive(Debug, Clone)]
pub struct S3Hosting {
    client: aws_sdk_s3::Client,
    bucket: String,
    config: HostingConfig,
    http: reqwest::Client,
}

impl S3Hosting {
    /// Build a client from validated settings.
    pub async fn connect(settings: &HostingSettings) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let (Some(key), Some(secret)) = (&settings.access_key_id, &settings.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                key.clone(),
                secret.clone(),
                None,
                None,
                "roomify-hosting",
            ));
        }
        if let Some(endpoint) = &settings.endpoint_url {
            loader = loader.endpoint_url(endpoint.clone());
        }
        let shared = loader.load().await;

        // Custom endpoints (MinIO and friends) generally need path-style addressing.
        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(settings.endpoint_url.is_some())
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: settings.bucket.clone().unwrap_or_default(),
            config: HostingConfig::new(&settings.public_base_url),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl HostingBackend for S3Hosting {
    async fn upload(&self, source: UploadSource, path: &str) -> Result<HostedObject, HostingError> {
        let key = path.trim_start_matches('/');
        let image = materialize(&self.http, source).await?;
        let size = image.data.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(image.content_type)
            .body(ByteStream::from(image.data))
            .send()
            .await
            .map_err(|e| HostingError::Upload(format!("put_object {key}: {e}")))?;

        tracing::debug!(bucket = %self.bucket, key, bytes = size, "Hosted image in bucket");
        Ok(HostedObject {
            url: self.config.url_for(key),
        })
    }
}

#[async_trait]
impl HostingConfigProvider for S3Hosting {
    /// Confirms the bucket exists, creating it when it does not.
    async fn get_or_create(&self) -> Result<HostingConfig, HostingError> {
        if self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok()
        {
            return Ok(self.config.clone());
        }

        tracing::info!(bucket = %self.bucket, "Hosting bucket not found, creating");
        self.client
            .create_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| HostingError::Config(format!("create_bucket {}: {e}", self.bucket)))?;

        Ok(self.config.clone())
    }
}
