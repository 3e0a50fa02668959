//! Tests for `AppError` -> HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server needed.

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use roomify_api::error::AppError;
use roomify_core::error::CoreError;
use roomify_core::kv::KvError;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Project",
        id: "p3".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, serde_json::json!({"error": "Project not found"}));
}

#[tokio::test]
async fn validation_error_returns_400_with_message_as_error() {
    let err = AppError::Core(CoreError::Validation("Project id is too long".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Project id is too long");
    assert!(json.get("message").is_none());
}

#[tokio::test]
async fn unauthorized_error_hides_reason() {
    let err = AppError::unauthorized("Invalid or expired token: ExpiredSignature");

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json, serde_json::json!({"error": "Authentication failed"}));
}

#[tokio::test]
async fn storage_error_returns_500_with_operation_and_message() {
    let err = AppError::storage("Failed to save project")(KvError::Backend("disk full".into()));
    assert_matches!(&err, AppError::Storage { operation: "Failed to save project", .. });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to save project");
    assert_eq!(json["message"], "KV backend error: disk full");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("Invalid JSON payload".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid JSON payload");
}
