//! Download of foreign image URLs ahead of re-hosting.

use roomify_core::hosting::{HostingError, UploadSource};

/// Bytes and MIME type of a fetched image.
#[derive(Debug)]
pub struct FetchedImage {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Content type assumed when the origin does not send one.
const FALLBACK_CONTENT_TYPE: &str = "image/png";

/// Fetch `url` and return its body.
pub async fn fetch_image(client: &reqwest::Client, url: &str) -> Result<FetchedImage, HostingError> {
    let fetch_err = |reason: String| HostingError::Fetch {
        url: url.to_string(),
        reason,
    };

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| fetch_err(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(fetch_err(format!("status {status}")));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or_default().trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

    let data = response
        .bytes()
        .await
        .map_err(|e| fetch_err(e.to_string()))?
        .to_vec();
    if data.is_empty() {
        return Err(fetch_err("empty body".into()));
    }

    Ok(FetchedImage { data, content_type })
}

/// Turn an [`UploadSource`] into raw bytes, fetching URLs.
pub async fn materialize(
    client: &reqwest::Client,
    source: UploadSource,
) -> Result<FetchedImage, HostingError> {
    match source {
        UploadSource::Bytes { data, content_type } => Ok(FetchedImage { data, content_type }),
        UploadSource::Url(url) => fetch_image(client, &url).await,
    }
}
