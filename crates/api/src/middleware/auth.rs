//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller, resolved from the `Authorization: Bearer` header.
///
/// List it before any body or query extractor so identity failures win over
/// validation failures.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user id (`claims.sub`) that scopes every stored key.
    pub user_id: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Authorization is not a Bearer token"))?;

        let claims = validate_token(token.trim(), &state.config.jwt)
            .map_err(|e| AppError::unauthorized(format!("Invalid or expired token: {e}")))?;

        let user_id = claims.sub.trim();
        if !is_valid_user_id(user_id) {
            return Err(AppError::unauthorized("Token subject is not a usable user id"));
        }

        Ok(AuthUser {
            user_id: user_id.to_string(),
        })
    }
}

/// Non-empty and free of `_`, the separator of `{namespace}_{user}_{id}`
/// keys. Otherwise one user's prefix could cover another's keys.
fn is_valid_user_id(user_id: &str) -> bool {
    !user_id.is_empty() && !user_id.contains('_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_rules() {
        assert!(is_valid_user_id("6f1c2a90-3b2e-4d1f-9a55-0c7f8e1d2b3a"));
        assert!(!is_valid_user_id(""));
        assert!(!is_valid_user_id("u1_x"));
    }
}
