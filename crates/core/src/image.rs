//! Image payload classification and hosted-path naming.
//!
//! Images reach the persistence layer either embedded (`data:` URLs produced
//! by the upload pipeline) or as URLs. Only URLs under the hosting base are
//! considered hosted; anything else must be re-hosted before persisting.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Storage paths
// ---------------------------------------------------------------------------

/// Folder for hosted floor-plan images.
pub const STORAGE_SOURCES: &str = "roomify/sources";

/// Folder for hosted renders.
pub const STORAGE_RENDERS: &str = "roomify/renders";

/// Which image of a project is being hosted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLabel {
    Source,
    Rendered,
}

impl ImageLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Rendered => "rendered",
        }
    }

    fn folder(self) -> &'static str {
        match self {
            Self::Source => STORAGE_SOURCES,
            Self::Rendered => STORAGE_RENDERS,
        }
    }
}

/// Deterministic hosted path for a project's image.
///
/// The same `(project_id, label, content_type)` always maps to the same path,
/// so re-hosting overwrites rather than duplicating. Bytes outside
/// `[A-Za-z0-9_-]` are escaped as `~XX` to keep distinct ids distinct.
///
/// ```
/// use roomify_core::image::{hosted_path, ImageLabel};
///
/// assert_eq!(hosted_path("p1", ImageLabel::Source, "image/png"), "roomify/sources/p1.png");
/// assert_eq!(hosted_path("p1", ImageLabel::Rendered, "image/jpeg"), "roomify/renders/p1.jpg");
/// ```
pub fn hosted_path(project_id: &str, label: ImageLabel, content_type: &str) -> String {
    let mut safe_id = String::with_capacity(project_id.len());
    for byte in project_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            safe_id.push(byte as char);
        } else {
            safe_id.push_str(&format!("~{byte:02X}"));
        }
    }
    format!("{}/{safe_id}.{}", label.folder(), extension_for(content_type))
}

/// File extension for an image MIME type (`png` when unknown).
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Decoded embedded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// An image reference as the sync layer sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Inline `data:` payload; must be uploaded.
    Embedded(EmbeddedImage),
    /// Already under the hosting base URL.
    Hosted(String),
    /// An `http(s)` URL elsewhere; must be fetched and re-hosted.
    External(String),
}

/// Cheap check for an embedded payload, without decoding.
pub fn is_embedded(raw: &str) -> bool {
    raw.trim_start().starts_with("data:")
}

/// Whether `url` lives under `hosting_base`.
pub fn is_hosted_url(url: &str, hosting_base: &str) -> bool {
    let base = hosting_base.trim_end_matches('/');
    !base.is_empty()
        && url
            .strip_prefix(base)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

impl ImageRef {
    /// Classify a raw image string relative to the hosting base URL.
    pub fn classify(raw: &str, hosting_base: &str) -> Result<Self, CoreError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(CoreError::Validation("image reference is empty".into()));
        }
        if is_embedded(raw) {
            return parse_data_url(raw).map(Self::Embedded);
        }
        if is_hosted_url(raw, hosting_base) {
            return Ok(Self::Hosted(raw.to_string()));
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Ok(Self::External(raw.to_string()));
        }
        Err(CoreError::Validation(format!(
            "unsupported image reference scheme: {}",
            raw.split(':').next().unwrap_or_default()
        )))
    }
}

/// Decode a base64 `data:` URL.
pub fn parse_data_url(raw: &str) -> Result<EmbeddedImage, CoreError> {
    let rest = raw
        .strip_prefix("data:")
        .ok_or_else(|| CoreError::Validation("not a data URL".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| CoreError::Validation("data URL has no payload".into()))?;
    let content_type = meta
        .strip_suffix(";base64")
        .ok_or_else(|| CoreError::Validation("only base64 data URLs are supported".into()))?;
    // Drop MIME parameters such as `;name=plan.jpg`.
    let content_type = match content_type.split(';').next().unwrap_or_default().trim() {
        "" => "application/octet-stream",
        essence => essence,
    };

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| CoreError::Validation(format!("data URL payload is not base64: {e}")))?;
    if bytes.is_empty() {
        return Err(CoreError::Validation("data URL payload is empty".into()));
    }

    Ok(EmbeddedImage {
        content_type: content_type.to_string(),
        bytes,
    })
}

/// Encode bytes as a base64 `data:` URL.
pub fn to_data_url(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{content_type};base64,{}", STANDARD.encode(bytes))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
