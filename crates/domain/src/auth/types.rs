//! Authentication and token types

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Keys under which credentials are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CredentialKey {
    /// Short-lived access token sent as a bearer credential.
    AccessToken,
    /// Longer-lived token exchanged for a new access token.
    RefreshToken,
}

impl CredentialKey {
    /// Every key the credential store knows about.
    pub const ALL: [Self; 2] = [Self::AccessToken, Self::RefreshToken];

    /// Returns the storage name of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "accessToken",
            Self::RefreshToken => "refreshToken",
        }
    }
}

impl std::fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access and refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// The access token.
    pub access_token: String,
    /// The refresh token.
    pub refresh_token: String,
}

impl TokenPair {
    /// Creates a token pair.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

/// Body of `POST /auth/refresh` and `POST /auth/logout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// The refresh token to exchange or revoke.
    pub refresh_token: String,
}

/// Body of `POST /auth/change-password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// The password currently in use.
    pub current_password: String,
    /// The replacement password.
    pub new_password: String,
}

/// Token response of the login and register endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// JWT access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: u64,
    /// Token type, usually "Bearer".
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Authenticated user id.
    #[serde(default)]
    pub user_id: Option<Uuid>,
    /// Authenticated user email.
    #[serde(default)]
    pub email: Option<String>,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl AuthResponse {
    /// Returns the token pair carried by this response.
    #[must_use]
    pub fn tokens(&self) -> TokenPair {
        TokenPair::new(self.access_token.clone(), self.refresh_token.clone())
    }

    /// Returns the session user described by this response.
    ///
    /// User fields come from the response body the server signed off on, not
    /// from decoding the access token payload client-side.
    #[must_use]
    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            id: self.user_id,
            email: self.email.clone().unwrap_or_default(),
            first_name: self.first_name.clone().unwrap_or_default(),
            last_name: self.last_name.clone().unwrap_or_default(),
        }
    }
}

/// Successful response of `POST /auth/refresh`.
///
/// The refresh token is only present when the server rotates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// New access token.
    pub access_token: String,
    /// Rotated refresh token, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// The user a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// User id, when the server reported one.
    pub id: Option<Uuid>,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl SessionUser {
    /// Full display name, falling back to the email.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

/// Authentication errors.
///
/// `Clone` so that the outcome of one refresh can be handed to every caller
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No refresh token was available when the access token was rejected.
    #[error("not authenticated: no refresh token available")]
    Unauthenticated,

    /// The refresh endpoint answered with a non-2xx status.
    #[error("token refresh rejected with status {status}: {message}")]
    RefreshRejected {
        /// HTTP status returned by the refresh endpoint.
        status: u16,
        /// Error description.
        message: String,
    },

    /// The refresh call could not be completed.
    #[error("failed to refresh token: {message}")]
    RefreshFailed {
        /// Error description.
        message: String,
    },

    /// The refresh call did not finish in time.
    #[error("token refresh timed out after {timeout_ms} ms")]
    RefreshTimedOut {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The refresh leader went away before settling the refresh.
    #[error("token refresh was abandoned before it completed")]
    RefreshAbandoned,

    /// Credentials could not be read or written.
    #[error("credential store error: {message}")]
    CredentialStore {
        /// Error description.
        message: String,
    },
}

/// Get a preview of a token for logs (first 8 chars + ...).
#[must_use]
pub fn token_preview(token: &str) -> String {
    match token.char_indices().nth(8) {
        Some((idx, _)) if token.len() > 12 => format!("{}...", &token[..idx]),
        _ => token.to_string(),
    }
}
