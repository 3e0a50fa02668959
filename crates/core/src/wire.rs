//! JSON bodies exchanged with the remote project service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::project::{Project, Visibility};

/// `POST /api/projects/save` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveProjectRequest {
    pub project: Project,
    #[serde(default)]
    pub visibility: Visibility,
}

/// `POST /api/projects/save` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveProjectResponse {
    pub saved: bool,
    pub id: String,
    pub project: Value,
}

/// `GET /api/projects/list` success body. Values are returned as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListProjectsResponse {
    pub projects: Vec<Value>,
}

/// `GET /api/projects/get` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProjectResponse {
    pub project: Value,
}

/// Uniform error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
