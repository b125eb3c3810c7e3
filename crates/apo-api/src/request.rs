//! Request model shared by every call-site.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Result};

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// The wire representation of the method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Whether request params travel in the body rather than the query
    /// string.
    #[must_use]
    pub fn has_body(&self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One network operation: method, endpoint path and an optional payload.
///
/// The payload shape is generic (`serde_json::Value`); typed decoding
/// happens at the call-site that knows what it asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Endpoint path, resolved against the configured base URL.
    pub endpoint: String,
    /// Request payload. `Null` means no payload.
    pub params: Value,
}

impl ApiRequest {
    /// Create a request with no payload.
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            params: Value::Null,
        }
    }

    /// Attach a payload to the request.
    #[must_use]
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    /// Pre-flight validation. Failures here are raised before any network
    /// call is issued.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(ApiError::Validation {
                field: "endpoint".to_string(),
                message: "endpoint path must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
