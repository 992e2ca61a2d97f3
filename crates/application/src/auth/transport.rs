//! Bearer-token transport with transparent session recovery.

use std::sync::Arc;
use std::time::Duration;

use purse_domain::{ApiRequest, ApiResponse, AuthError, CredentialKey, token_preview};
use tracing::{debug, info, warn};

use crate::auth::coordinator::{RefreshCoordinator, RefreshLease, RefreshRole};
use crate::error::ApplicationResult;
use crate::ports::{CredentialStore, HttpTransport, LoginRedirect, TokenRefresher};

/// Default limit on a single refresh call.
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(30);

/// Wraps an [`HttpTransport`] with bearer authentication.
///
/// Outbound requests carry the stored access token. A 401 response starts
/// (or joins) a single refresh and the request is replayed once with the new
/// token. The replay's response is returned as-is, so a second 401 reaches
/// the caller. When the session cannot be recovered, credentials are cleared
/// and the [`LoginRedirect`] fires.
///
/// The refresh itself runs on a spawned task, so `send` and `refresh_now`
/// must be called from within a Tokio runtime.
#[derive(Clone)]
pub struct AuthenticatedTransport {
    inner: Arc<dyn HttpTransport>,
    store: Arc<dyn CredentialStore>,
    refresher: Arc<dyn TokenRefresher>,
    redirect: Arc<dyn LoginRedirect>,
    coordinator: Arc<RefreshCoordinator>,
    refresh_timeout: Option<Duration>,
}

impl AuthenticatedTransport {
    /// Create a transport with its own coordinator and the default refresh
    /// timeout.
    #[must_use]
    pub fn new(
        inner: Arc<dyn HttpTransport>,
        store: Arc<dyn CredentialStore>,
        refresher: Arc<dyn TokenRefresher>,
        redirect: Arc<dyn LoginRedirect>,
    ) -> Self {
        Self {
            inner,
            store,
            refresher,
            redirect,
            coordinator: Arc::new(RefreshCoordinator::new()),
            refresh_timeout: Some(DEFAULT_REFRESH_TIMEOUT),
        }
    }

    /// Set the refresh timeout. `None` lets a refresh run indefinitely.
    #[must_use]
    pub const fn with_refresh_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    /// The unauthenticated transport underneath.
    #[must_use]
    pub fn inner(&self) -> &Arc<dyn HttpTransport> {
        &self.inner
    }

    /// The credential store tokens are read from.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// The refresh coordinator of this transport.
    #[must_use]
    pub fn coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.coordinator
    }

    /// Sends a request with the stored access token attached.
    ///
    /// Every HTTP status other than a recoverable 401 is returned as a
    /// response.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Transport` if no response was received,
    /// `ApplicationError::Credentials` if the access token cannot be read,
    /// and `ApplicationError::Auth` if the session could not be recovered.
    pub async fn send(&self, request: ApiRequest) -> ApplicationResult<ApiResponse> {
        let request = match self.store.get(CredentialKey::AccessToken).await? {
            Some(token) => request.with_bearer(&token),
            None => request,
        };

        let response = self.inner.send(&request).await?;
        if !response.status.is_unauthorized() {
            return Ok(response);
        }

        debug!(
            method = %request.method,
            path = %request.path,
            "Access token rejected, recovering session"
        );
        self.recover(request).await
    }

    /// Refreshes the access token now, joining a refresh already in flight.
    ///
    /// # Errors
    ///
    /// Returns the refresh error. Terminal failures clear credentials and
    /// fire the login redirect.
    pub async fn refresh_now(&self) -> Result<String, AuthError> {
        match self.coordinator.begin_or_join() {
            RefreshRole::Leader(lease) => {
                // The lease lives in its own task so that dropping this
                // caller cancels only its replay, never the refresh.
                let transport = self.clone();
                tokio::spawn(async move { transport.lead_refresh(lease).await })
                    .await
                    .unwrap_or_else(|err| {
                        warn!(error = %err, "Token refresh task did not complete");
                        Err(AuthError::RefreshAbandoned)
                    })
            }
            RefreshRole::Follower(waiter) => waiter.wait().await,
        }
    }

    async fn recover(&self, request: ApiRequest) -> ApplicationResult<ApiResponse> {
        let token = self.refresh_now().await?;
        let replay = request.with_bearer(&token);
        let response = self.inner.send(&replay).await?;
        debug!(status = %response.status, path = %replay.path, "Replayed request");
        Ok(response)
    }

    async fn lead_refresh(&self, lease: RefreshLease) -> Result<String, AuthError> {
        let refresh_token = match self.store.get(CredentialKey::RefreshToken).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                warn!("No refresh token stored, session ended");
                return Err(self.fail(lease, AuthError::Unauthenticated).await);
            }
            Err(err) => {
                let error = AuthError::CredentialStore {
                    message: err.to_string(),
                };
                return Err(self.fail(lease, error).await);
            }
        };

        let result = match self.refresh_timeout {
            Some(timeout) => {
                tokio::time::timeout(timeout, self.refresher.refresh(&refresh_token))
                    .await
                    .unwrap_or_else(|_| {
                        Err(AuthError::RefreshTimedOut {
                            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                        })
                    })
            }
            None => self.refresher.refresh(&refresh_token).await,
        };

        match result {
            Ok(refreshed) => {
                if let Err(err) = self
                    .store
                    .set(CredentialKey::AccessToken, &refreshed.access_token)
                    .await
                {
                    warn!(error = %err, "Failed to persist refreshed access token");
                }
                if let Some(rotated) = &refreshed.refresh_token
                    && let Err(err) = self.store.set(CredentialKey::RefreshToken, rotated).await
                {
                    warn!(error = %err, "Failed to persist rotated refresh token");
                }

                let notified = lease.resolve(refreshed.access_token.clone());
                info!(
                    token = %token_preview(&refreshed.access_token),
                    rotated = refreshed.refresh_token.is_some(),
                    notified,
                    "Token refreshed"
                );
                Ok(refreshed.access_token)
            }
            Err(error) => {
                warn!(%error, "Token refresh failed, session ended");
                Err(self.fail(lease, error).await)
            }
        }
    }

    /// Clears credentials, signals login, then rejects the followers.
    async fn fail(&self, lease: RefreshLease, error: AuthError) -> AuthError {
        if let Err(err) = self.store.clear().await {
            warn!(error = %err, "Failed to clear credentials");
        }
        self.redirect.login_required();
        let notified = lease.reject(error.clone());
        debug!(notified, "Rejected queued requests");
        error
    }
}
