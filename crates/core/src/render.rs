//! AI render collaborator seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Edge length, in pixels, requested for renders.
pub const IMAGE_RENDER_DIMENSION: u32 = 1024;

/// Output of a render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOutput {
    /// Rendered image, embedded or as a URL.
    pub rendered_image: String,
    /// Local path of the render, if the generator wrote one. Never persisted.
    #[serde(default)]
    pub rendered_path: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Render request failed: {0}")]
    Request(String),

    #[error("Render service returned no image")]
    EmptyOutput,
}

/// Turns a hosted floor-plan URL into a rendered image.
#[async_trait]
pub trait RenderService: Send + Sync {
    async fn generate(&self, source_image_url: &str) -> Result<RenderOutput, RenderError>;
}
