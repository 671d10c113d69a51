//! Error types for the HobbyHub REST API client.

use thiserror::Error;

/// Errors surfaced by [`crate::ApiDispatcher`] and the typed endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: connection refused, timeout, TLS.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Still unauthorized after every credential refresh and retry.
    #[error("Unauthorized after {attempts} attempts")]
    Unauthorized { attempts: u32 },

    /// The resource does not exist. Callers treat this as an empty result.
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// Any other non-success status. `message` is the `{ message }` body,
    /// when the server sent one.
    #[error(
        "API error: {status} - {}",
        .message.as_deref().unwrap_or("no message")
    )]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response from {path}: {message}")]
    Decode { path: String, message: String },

    /// An identical mutating request is already in flight.
    #[error("Request already in progress: {method} {path}")]
    DuplicateRequest { method: String, path: String },

    /// Minting the bearer credential failed.
    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// The server-provided message, if the server sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
