//! Token refresh port

use async_trait::async_trait;
use purse_domain::{AuthError, RefreshResponse};

/// Exchanges a refresh token for a new access token.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Calls the refresh endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::RefreshRejected` when the endpoint answers with a
    /// non-2xx status and `AuthError::RefreshFailed` when it cannot be reached
    /// or its body is unreadable.
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, AuthError>;
}
