//! API request specification

use serde::Serialize;

use super::HttpMethod;
use crate::error::{DomainError, DomainResult};

/// Name of the header carrying the bearer token.
pub const AUTHORIZATION: &str = "Authorization";

/// A request against the wallet API.
///
/// `path` is relative to the configured API base URL (for example
/// `/wallets/me`). The transport adapter is responsible for joining it
/// with the base and encoding `query`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Path relative to the API base URL
    pub path: String,
    /// Query parameters, in order
    pub query: Vec<(String, String)>,
    /// Extra headers, in order
    pub headers: Vec<(String, String)>,
    /// JSON body, if any
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// Creates a request with no headers, query or body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBody` if the value cannot be serialized.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> DomainResult<Self> {
        let value =
            serde_json::to_value(body).map_err(|e| DomainError::InvalidBody(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Returns a copy of this request carrying `Authorization: Bearer <token>`.
    ///
    /// Any previous Authorization header is replaced.
    #[must_use]
    pub fn with_bearer(mut self, token: &str) -> Self {
        self.headers
            .retain(|(name, _)| !name.eq_ignore_ascii_case(AUTHORIZATION));
        self.headers
            .push((AUTHORIZATION.to_string(), format!("Bearer {token}")));
        self
    }

    /// Returns the first value of a header (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the bearer token attached to this request, if any.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.header(AUTHORIZATION)
            .and_then(|value| value.strip_prefix("Bearer "))
    }

    /// Validates that the path is usable.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPath` for empty paths or absolute URLs,
    /// and `DomainError::InvalidBody` for a body on GET or DELETE.
    pub fn validate(&self) -> DomainResult<()> {
        let path = self.path.trim();
        if path.is_empty() {
            return Err(DomainError::InvalidPath("path is empty".to_string()));
        }
        if path.contains("://") {
            return Err(DomainError::InvalidPath(format!(
                "expected a path relative to the API base, got {path}"
            )));
        }
        if self.body.is_some() && !self.method.has_body() {
            return Err(DomainError::InvalidBody(format!(
                "{} requests carry no body",
                self.method
            )));
        }
        Ok(())
    }
}
