//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port. Request paths are
//! resolved against the configured API base URL.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use purse_application::ports::{HttpTransport, TransportError};
use purse_domain::{ApiRequest, ApiResponse, DomainError, HttpMethod};
use reqwest::{Client, Method, Url};
use tracing::debug;

/// Redirects followed before giving up.
const MAX_REDIRECTS: usize = 10;

/// HTTP transport backed by `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a transport for the API at `base_url`.
    ///
    /// Default configuration:
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the client cannot be
    /// created.
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Self::with_client(client, base_url, timeout)
    }

    /// Creates a transport with a custom reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn with_client(
        client: Client,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{e}: {base_url}")))?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// The API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a request path and query against the base URL.
    ///
    /// The base path is kept: `/wallets/me` on `http://host/api/v1` becomes
    /// `http://host/api/v1/wallets/me`.
    fn resolve_url(&self, request: &ApiRequest) -> Result<Url, TransportError> {
        request.validate().map_err(|e| match e {
            DomainError::InvalidBody(message) => TransportError::InvalidBody(message),
            other => TransportError::InvalidUrl(other.to_string()),
        })?;

        let base = self.base_url.as_str().trim_end_matches('/');
        let path = request.path.trim_start_matches('/');
        let raw = format!("{base}/{path}");

        let mut url =
            Url::parse(&raw).map_err(|e| TransportError::InvalidUrl(format!("{e}: {raw}")))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout { timeout_ms };
        }

        let host = || {
            error
                .url()
                .and_then(|u| u.host_str().map(ToString::to_string))
                .unwrap_or_else(|| "unknown".to_string())
        };

        if error.is_connect() {
            let message = error.to_string();
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return TransportError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return TransportError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return TransportError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return TransportError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        TransportError::Other(error.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.resolve_url(request)?;
        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);

        let start = Instant::now();
        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .header("Accept", "application/json");

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            let bytes =
                serde_json::to_vec(body).map_err(|e| TransportError::InvalidBody(e.to_string()))?;
            if request.header("content-type").is_none() {
                builder = builder.header("Content-Type", "application/json");
            }
            builder = builder.body(bytes);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Other(format!("Failed to read body: {e}")))?
            .to_vec();
        let duration = start.elapsed();

        debug!(
            method = %request.method,
            path = %request.path,
            status,
            elapsed_ms = duration.as_millis(),
            "HTTP request completed"
        );

        Ok(ApiResponse::new(status, headers, body, duration))
    }
}
