//! Backend error envelope

use serde::{Deserialize, Serialize};

/// Error body returned by the wallet backend for non-2xx responses.
///
/// Every field is optional because gateways and proxies may answer with
/// partial or foreign bodies.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    /// Machine-readable code, e.g. `INSUFFICIENT_FUNDS`.
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// When the error occurred, as sent by the server.
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl ApiErrorBody {
    /// Parses an error body, returning `None` if it is not a JSON object.
    #[must_use]
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }
}
