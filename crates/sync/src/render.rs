//! HTTP client for the floor-plan render service.

use async_trait::async_trait;
use roomify_core::render::{RenderError, RenderOutput, RenderService, IMAGE_RENDER_DIMENSION};
use serde::Serialize;

/// Instructions sent with every render request.
pub const RENDER_PROMPT: &str = "\
TASK: Convert the input 2D floor plan into a photorealistic, top-down 3D architectural render.

STRICT REQUIREMENTS (do not violate):
1) REMOVE ALL TEXT: do not render any letters, numbers, labels, dimensions, or annotations. Floors must be continuous where text used to be.
2) GEOMETRY MUST MATCH: walls, rooms, doors, and windows must follow the exact lines and positions in the plan. Do not shift or resize.
3) TOP-DOWN ONLY: orthographic top-down view. No perspective tilt.
4) CLEAN, REALISTIC OUTPUT: crisp edges, balanced lighting, and realistic materials. No sketch or hand-drawn look.
5) NO EXTRA CONTENT: do not add rooms, furniture, or objects that are not clearly indicated by the plan.

STRUCTURE & DETAILS:
- Walls: extrude precisely from the plan lines. Consistent wall height and thickness.
- Doors: convert door swing arcs into open doors, aligned to the plan.
- Windows: convert thin perimeter lines into realistic glass windows.

FURNITURE & ROOM MAPPING (only where icons or fixtures are clearly shown):
- Bed icon: realistic bed with duvet and pillows.
- Sofa icon: modern sectional or sofa.
- Dining table icon: table with chairs.
- Kitchen icon: counters with sink and stove.
- Bathroom icon: toilet, sink, and tub or shower.
- Office/study icon: desk, chair, and minimal shelving.
- Porch/patio/balcony icon: outdoor seating or simple furniture (keep minimal).
- Utility/laundry icon: washer/dryer and minimal cabinetry.

STYLE & LIGHTING:
- Lighting: bright, neutral daylight. High clarity and balanced contrast.
- Materials: realistic wood/tile floors, clean walls, subtle shadows.
- Finish: professional architectural visualization; no text, no watermarks, no logos.";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderRequest<'a> {
    prompt: &'a str,
    source_image: &'a str,
    width: u32,
    height: u32,
}

/// Posts render requests to a single endpoint.
pub struct HttpRenderService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRenderService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl RenderService for HttpRenderService {
    async fn generate(&self, source_image_url: &str) -> Result<RenderOutput, RenderError> {
        let body = RenderRequest {
            prompt: RENDER_PROMPT,
            source_image: source_image_url,
            width: IMAGE_RENDER_DIMENSION,
            height: IMAGE_RENDER_DIMENSION,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| RenderError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Request(format!("render service returned {status}")));
        }

        let output: RenderOutput = response
            .json()
            .await
            .map_err(|e| RenderError::Request(e.to_string()))?;
        if output.rendered_image.trim().is_empty() {
            return Err(RenderError::EmptyOutput);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn posts_source_and_dimensions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "sourceImage": "https://h.example/s.png",
                "width": 1024,
                "height": 1024
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "renderedImage": "data:image/png;base64,AAAA"
            })))
            .mount(&server)
            .await;

        let render = HttpRenderService::new(server.uri());
        let output = render.generate("https://h.example/s.png").await.unwrap();
        assert_eq!(output.rendered_image, "data:image/png;base64,AAAA");
        assert_eq!(output.rendered_path, None);
    }

    #[tokio::test]
    async fn blank_output_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"renderedImage": ""})))
            .mount(&server)
            .await;

        let render = HttpRenderService::new(server.uri());
        assert_matches!(render.generate("https://h.example/s.png").await, Err(RenderError::EmptyOutput));
    }
}
