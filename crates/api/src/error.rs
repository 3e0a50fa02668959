use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use roomify_core::error::CoreError;
use roomify_core::kv::KvError;
use roomify_core::wire::ErrorBody;

/// Error body for every identity failure. Details are logged, never returned.
pub const MSG_AUTH_FAILED: &str = "Authentication failed";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Every variant renders as the `{error, message?}` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `roomify_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The backing store failed during `operation`.
    #[error("{operation}: {source}")]
    Storage {
        /// Client-facing summary, e.g. `Failed to save project`.
        operation: &'static str,
        #[source]
        source: KvError,
    },

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn storage(operation: &'static str) -> impl FnOnce(KvError) -> Self {
        move |source| Self::Storage { operation, source }
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Core(CoreError::Unauthorized(reason.into()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, .. } => {
                    (StatusCode::NOT_FOUND, format!("{entity} not found"), None)
                }
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
                CoreError::Unauthorized(reason) => {
                    tracing::debug!(reason = %reason, "Rejected unauthenticated request");
                    (StatusCode::UNAUTHORIZED, MSG_AUTH_FAILED.to_string(), None)
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal error".to_string(),
                        Some(msg.clone()),
                    )
                }
            },

            AppError::Storage { operation, source } => {
                tracing::error!(operation = *operation, error = %source, "Storage operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    operation.to_string(),
                    Some(source.to_string()),
                )
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
        };

        (status, axum::Json(ErrorBody { error, message })).into_response()
    }
}
