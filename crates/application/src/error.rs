//! Application error types

use purse_domain::{AuthError, DomainError};
use thiserror::Error;

use crate::ports::{CredentialError, TransportError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Session recovery failed.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The request never produced an HTTP response.
    #[error("HTTP error: {0}")]
    Transport(#[from] TransportError),

    /// Reading or writing stored credentials failed.
    #[error("credential store error: {0}")]
    Credentials(#[from] CredentialError),

    /// The backend answered with a non-2xx status.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Backend error code, if the body carried one.
        code: Option<String>,
        /// Backend message, or the reason phrase.
        message: String,
    },

    /// A 2xx body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApplicationError {
    /// HTTP status of an API error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the session ended and the user must sign in again.
    ///
    /// Only terminal refresh outcomes qualify. A 401 from a public endpoint
    /// such as login is an ordinary API error.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::Auth(
                AuthError::Unauthenticated
                    | AuthError::RefreshRejected { .. }
                    | AuthError::RefreshFailed { .. }
                    | AuthError::RefreshTimedOut { .. }
            )
        )
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
