//! Signed-in identity collaborator seam.

use async_trait::async_trait;

/// Yields the signed-in user, if any. Implementations never fail outward:
/// any lookup error is reported as "no user".
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn current_user_id(&self) -> Option<String>;

    /// Bearer credential presented to the remote project service.
    async fn access_token(&self) -> Option<String>;
}

/// Fixed identity, or anonymous when built with [`StaticAuth::anonymous`].
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    user_id: Option<String>,
    token: Option<String>,
}

impl StaticAuth {
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            token: Some(token.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn current_user_id(&self) -> Option<String> {
        self.user_id.clone()
    }

    async fn access_token(&self) -> Option<String> {
        self.token.clone()
    }
}
