//! Error types for the storefront API layer.
//!
//! Errors are split into two surfacing classes: *external* errors carry a
//! user-meaningful message and are shown inline near the originating input,
//! everything else is shown as a generic failure banner. Use
//! [`ApiError::is_external`] to pick the surface.

use thiserror::Error;

/// Errors produced by the transport layer and the call wrappers around it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Connectivity failure or a server-side fault (5xx).
    #[error("network error: {0}")]
    Network(String),

    /// The server explicitly rejected the request with a user-meaningful
    /// message (e.g. an invalid phone number).
    #[error("request rejected: {message}")]
    Business {
        /// Message returned by the server, suitable for inline display.
        message: String,
        /// Optional machine-readable code from the error envelope.
        code: Option<String>,
    },

    /// Pre-flight validation failure. No network call was issued.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Name of the offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// Non-2xx response that carried no recognizable business envelope.
    #[error("unexpected status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (possibly truncated).
        message: String,
    },

    /// The response-shaping interceptor failed.
    #[error("response interceptor error: {0}")]
    Interceptor(String),

    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Returns whether this error carries a user-meaningful message that
    /// should be surfaced inline rather than as a generic failure banner.
    #[must_use]
    pub fn is_external(&self) -> bool {
        matches!(self, Self::Business { .. } | Self::Validation { .. })
    }

    /// Returns a user-friendly message suitable for display in the UI.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => {
                "Could not reach the store. Please check your internet connection.".to_string()
            }
            Self::Business { message, .. } => message.clone(),
            Self::Validation { message, .. } => message.clone(),
            Self::Status { .. } | Self::Interceptor(_) | Self::Decode(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
