//! HTTP client for the remote project service.
//!
//! Wraps `POST /api/projects/save`, `GET /api/projects/list` and
//! `GET /api/projects/get` using [`reqwest`], attaching the signed-in user's
//! bearer credential when there is one.

use std::sync::Arc;

use roomify_core::auth::AuthProvider;
use roomify_core::project::{Project, StoredProject, Visibility};
use roomify_core::wire::{
    ErrorBody, GetProjectResponse, ListProjectsResponse, SaveProjectRequest, SaveProjectResponse,
};
use serde_json::Value;

/// Errors from the remote project service client.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Project service error ({status}): {error}")]
    Status {
        status: u16,
        /// `error` field of the response envelope, or the raw body.
        error: String,
    },

    /// The body did not have the expected shape.
    #[error("Malformed project service response: {0}")]
    Decode(String),
}

impl RemoteError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// Client for one remote project service deployment.
#[derive(Clone)]
pub struct RemoteProjectClient {
    client: reqwest::Client,
    base_url: String,
    auth: Arc<dyn AuthProvider>,
}

impl RemoteProjectClient {
    /// * `base_url` - Service root, e.g. `https://worker.example`.
    pub fn new(base_url: &str, auth: Arc<dyn AuthProvider>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, auth)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    /// Store `project` for the signed-in user and return the stamped record.
    pub async fn save(&self, project: &Project, visibility: Visibility) -> Result<Project, RemoteError> {
        let body = SaveProjectRequest {
            project: project.clone(),
            visibility,
        };
        let request = self.client.post(self.url("save")).json(&body);
        let response = self.authorize(request).await.send().await?;

        let saved: SaveProjectResponse = Self::parse_response(response).await?;
        Self::project_from(saved.project)
    }

    /// All stored values for the signed-in user, as returned by the service.
    pub async fn list(&self) -> Result<Vec<Value>, RemoteError> {
        let request = self.client.get(self.url("list"));
        let response = self.authorize(request).await.send().await?;

        let listed: ListProjectsResponse = Self::parse_response(response).await?;
        Ok(listed.projects)
    }

    /// Fetch one project of the signed-in user.
    pub async fn get(&self, id: &str) -> Result<Project, RemoteError> {
        let request = self.client.get(self.url("get")).query(&[("id", id)]);
        let response = self.authorize(request).await.send().await?;

        let found: GetProjectResponse = Self::parse_response(response).await?;
        Self::project_from(found.project)
    }

    // ---- private helpers ----

    fn url(&self, op: &str) -> String {
        format!("{}/api/projects/{op}", self.base_url)
    }

    async fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth.access_token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn project_from(value: Value) -> Result<Project, RemoteError> {
        match StoredProject::from_value(value) {
            StoredProject::Valid(p) => Ok(p),
            StoredProject::Invalid(reason) => Err(RemoteError::Decode(reason)),
        }
    }

    /// Ensure the response has a success status code, surfacing the
    /// envelope's `error` field otherwise.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            let error = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(RemoteError::Status {
                status: status.as_u16(),
                error,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RemoteError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}
