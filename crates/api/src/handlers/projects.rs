//! Handlers for the `/api/projects` resource.
//!
//! Every handler authenticates first, then validates, then touches the
//! store. Nothing is written unless every check passed.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use roomify_core::error::CoreError;
use roomify_core::image::is_embedded;
use roomify_core::keys::{remote_project_key, remote_user_prefix};
use roomify_core::project::{validate_project_id, MSG_INVALID_ID};
use roomify_core::wire::{GetProjectResponse, ListProjectsResponse, SaveProjectResponse};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub const MSG_INVALID_JSON: &str = "Invalid JSON payload";
pub const MSG_SOURCE_IMAGE_REJECTED: &str = "sourceImage must not be included in project payload";
pub const MSG_EMBEDDED_RENDER: &str = "renderedImage must be a hosted URL";
pub const MSG_MISSING_ID_PARAM: &str = "Missing id parameter";

/// POST /api/projects/save
///
/// Body: `{project, visibility?}`. Stores the project with a fresh
/// `updatedAt` and echoes the stored record.
pub async fn save(
    user: AuthUser,
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<SaveProjectResponse>> {
    let body: Value =
        serde_json::from_slice(&body).map_err(|_| AppError::BadRequest(MSG_INVALID_JSON.into()))?;

    let mut project = match body.get("project") {
        Some(Value::Object(fields)) => fields.clone(),
        _ => return Err(CoreError::Validation(MSG_INVALID_ID.into()).into()),
    };
    let raw_id = project.get("id").and_then(Value::as_str).unwrap_or_default();
    let id = validate_project_id(raw_id)?;

    if project.get("sourceImage").is_some_and(is_set) {
        return Err(AppError::BadRequest(MSG_SOURCE_IMAGE_REJECTED.into()));
    }
    if project
        .get("renderedImage")
        .and_then(Value::as_str)
        .is_some_and(is_embedded)
    {
        return Err(AppError::BadRequest(MSG_EMBEDDED_RENDER.into()));
    }

    stamp(&mut project, &id, body.get("visibility"));
    let record = Value::Object(project);

    let key = remote_project_key(&state.config.namespace, &user.user_id, &id);
    state
        .store
        .set(&key, record.clone())
        .await
        .map_err(AppError::storage("Failed to save project"))?;

    tracing::info!(user_id = %user.user_id, project_id = %id, "Project saved");
    Ok(Json(SaveProjectResponse {
        saved: true,
        id,
        project: record,
    }))
}

/// GET /api/projects/list
///
/// Every stored value under the caller's prefix, in key order.
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ListProjectsResponse>> {
    let prefix = remote_user_prefix(&state.config.namespace, &user.user_id);
    let entries = state
        .store
        .list(&prefix)
        .await
        .map_err(AppError::storage("Failed to list projects"))?;

    Ok(Json(ListProjectsResponse {
        projects: entries.into_iter().map(|entry| entry.value).collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct GetProjectParams {
    pub id: Option<String>,
}

/// GET /api/projects/get?id=
pub async fn get(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<GetProjectParams>,
) -> AppResult<Json<GetProjectResponse>> {
    let id = params
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest(MSG_MISSING_ID_PARAM.into()))?;

    let key = remote_project_key(&state.config.namespace, &user.user_id, &id);
    let project = state
        .store
        .get(&key)
        .await
        .map_err(AppError::storage("Failed to get project"))?
        .filter(|value| !value.is_null())
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    Ok(Json(GetProjectResponse { project }))
}

/// OPTIONS /api/projects/*
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Loose presence check: `null`, `false` and `""` count as absent.
fn is_set(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false)) && value.as_str() != Some("")
}

/// Write the trimmed id and a fresh `updatedAt`; take the request-level
/// visibility when the project carries none.
fn stamp(project: &mut Map<String, Value>, id: &str, visibility: Option<&Value>) {
    project.insert("id".into(), Value::String(id.to_string()));
    project.insert(
        "updatedAt".into(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    if let Some(visibility @ Value::String(_)) = visibility {
        project
            .entry("visibility")
            .or_insert_with(|| visibility.clone());
    }
}
