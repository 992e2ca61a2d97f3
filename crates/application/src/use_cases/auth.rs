//! Sign-in, sign-up and session lifecycle.

use purse_domain::{
    ApiRequest, AuthResponse, ChangePasswordRequest, CredentialKey, LoginRequest, RefreshRequest,
    RegisterRequest, SessionUser,
};
use tracing::{debug, info, warn};

use crate::api::{ApiClient, decode};
use crate::error::ApplicationResult;

/// Use case for the authentication endpoints.
///
/// Login, registration and logout are sent on the raw transport: a 401 there
/// means bad credentials, not an expired session.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    /// Creates the service.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Signs in and stores the issued tokens.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Api` with status 401 for wrong credentials,
    /// or a transport or credential store error.
    pub async fn login(&self, email: &str, password: &str) -> ApplicationResult<SessionUser> {
        let request = ApiRequest::post("/auth/login").with_json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        self.authenticate(request).await
    }

    /// Creates an account and stores the issued tokens.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Api` if the backend refuses the account,
    /// or a transport or credential store error.
    pub async fn register(&self, registration: &RegisterRequest) -> ApplicationResult<SessionUser> {
        let request = ApiRequest::post("/auth/register").with_json(registration)?;
        self.authenticate(request).await
    }

    /// Refreshes the access token through the shared refresh path.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Auth` with the refresh error.
    pub async fn refresh(&self) -> ApplicationResult<()> {
        self.api.transport().refresh_now().await?;
        Ok(())
    }

    /// Revokes the refresh token on the server and clears local credentials.
    ///
    /// Revocation is best-effort; local credentials are cleared even if the
    /// server cannot be reached.
    ///
    /// # Errors
    ///
    /// Returns an error only if local credentials cannot be cleared.
    pub async fn logout(&self) -> ApplicationResult<()> {
        let store = self.api.transport().store();
        let refresh_token = store.get(CredentialKey::RefreshToken).await?;
        let access_token = store.get(CredentialKey::AccessToken).await?;

        if let Some(refresh_token) = refresh_token {
            let mut request =
                ApiRequest::post("/auth/logout").with_json(&RefreshRequest { refresh_token })?;
            if let Some(token) = access_token {
                request = request.with_bearer(&token);
            }

            match self.api.transport().inner().send(&request).await {
                Ok(response) if response.is_success() => debug!("Refresh token revoked"),
                Ok(response) => warn!(status = %response.status, "Logout rejected by server"),
                Err(err) => warn!(error = %err, "Logout request failed"),
            }
        }

        store.clear().await?;
        info!("Signed out");
        Ok(())
    }

    /// Changes the password of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Api` if the current password is wrong or
    /// the new one is refused.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> ApplicationResult<()> {
        let request = ApiRequest::post("/auth/change-password").with_json(&ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        })?;
        self.api.execute(request).await
    }

    /// Returns true if an access token is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential store cannot be read.
    pub async fn is_authenticated(&self) -> ApplicationResult<bool> {
        let token = self
            .api
            .transport()
            .store()
            .get(CredentialKey::AccessToken)
            .await?;
        Ok(token.is_some())
    }

    async fn authenticate(&self, request: ApiRequest) -> ApplicationResult<SessionUser> {
        let response = self.api.transport().inner().send(&request).await?;
        let auth: AuthResponse = decode(&response)?;

        self.api
            .transport()
            .store()
            .save_tokens(&auth.tokens())
            .await?;

        let user = auth.session_user();
        info!(email = %user.email, "Signed in");
        Ok(user)
    }
}
