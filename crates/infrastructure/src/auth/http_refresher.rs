//! Refresh-token exchange over HTTP.

use std::sync::Arc;

use async_trait::async_trait;
use purse_application::ports::{HttpTransport, TokenRefresher};
use purse_domain::{ApiErrorBody, ApiRequest, AuthError, RefreshRequest, RefreshResponse};
use tracing::debug;

/// Path of the refresh endpoint, relative to the API base URL.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Calls `POST /auth/refresh` on the raw (unauthenticated) transport.
///
/// Going around the authenticated transport keeps a rejected refresh from
/// starting another refresh.
#[derive(Clone)]
pub struct HttpTokenRefresher {
    transport: Arc<dyn HttpTransport>,
}

impl HttpTokenRefresher {
    /// Create a refresher sending through `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, AuthError> {
        let request = ApiRequest::post(REFRESH_PATH)
            .with_json(&RefreshRequest {
                refresh_token: refresh_token.to_string(),
            })
            .map_err(|e| AuthError::RefreshFailed {
                message: e.to_string(),
            })?;

        let response =
            self.transport
                .send(&request)
                .await
                .map_err(|e| AuthError::RefreshFailed {
                    message: e.to_string(),
                })?;

        if !response.is_success() {
            let message = ApiErrorBody::parse(&response.body)
                .and_then(|body| body.message)
                .unwrap_or_else(|| response.status.reason_phrase().to_string());
            debug!(status = %response.status, %message, "Refresh endpoint rejected token");
            return Err(AuthError::RefreshRejected {
                status: response.status.as_u16(),
                message,
            });
        }

        response
            .json_body::<RefreshResponse>()
            .map_err(|e| AuthError::RefreshFailed {
                message: format!("Failed to parse refresh response: {e}"),
            })
    }
}
