//! Typed access to the wallet API.

use purse_domain::{ApiErrorBody, ApiRequest, ApiResponse};
use serde::de::DeserializeOwned;

use crate::auth::AuthenticatedTransport;
use crate::error::{ApplicationError, ApplicationResult};

/// Sends requests through an [`AuthenticatedTransport`] and decodes the
/// responses.
#[derive(Clone)]
pub struct ApiClient {
    transport: AuthenticatedTransport,
}

impl ApiClient {
    /// Creates a client on top of an authenticated transport.
    #[must_use]
    pub const fn new(transport: AuthenticatedTransport) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &AuthenticatedTransport {
        &self.transport
    }

    /// Sends a request and decodes its JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Api` for non-2xx responses,
    /// `ApplicationError::Decode` if the body does not match `T`, and any
    /// transport or session error.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> ApplicationResult<T> {
        let response = self.transport.send(request).await?;
        decode(&response)
    }

    /// Sends a request whose response body is not needed.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::fetch`], minus decoding.
    pub async fn execute(&self, request: ApiRequest) -> ApplicationResult<()> {
        let response = self.transport.send(request).await?;
        ensure_success(&response)
    }
}

/// Maps a non-2xx response to `ApplicationError::Api`.
///
/// # Errors
///
/// Returns the API error carried by the response.
pub fn ensure_success(response: &ApiResponse) -> ApplicationResult<()> {
    if response.is_success() {
        return Ok(());
    }

    let body = ApiErrorBody::parse(&response.body);
    let code = body.as_ref().and_then(|b| b.code.clone());
    let message = body
        .and_then(|b| b.message)
        .unwrap_or_else(|| response.status.reason_phrase().to_string());

    Err(ApplicationError::Api {
        status: response.status.as_u16(),
        code,
        message,
    })
}

/// Decodes a successful JSON response.
///
/// An empty body decodes as JSON `null`, so `()` and `Option<T>` accept it.
///
/// # Errors
///
/// Returns `ApplicationError::Api` for non-2xx responses and
/// `ApplicationError::Decode` if the body does not match `T`.
pub fn decode<T: DeserializeOwned>(response: &ApiResponse) -> ApplicationResult<T> {
    ensure_success(response)?;

    let body = if response.body.iter().all(u8::is_ascii_whitespace) {
        b"null".as_slice()
    } else {
        response.body.as_slice()
    };
    serde_json::from_slice(body).map_err(|e| ApplicationError::Decode(e.to_string()))
}
