//! Host error types.

use thiserror::Error;

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Errors surfaced by the host SDK or the requests it proxies.
#[derive(Debug, Error)]
pub enum HostError {
    /// The SDK object could not be obtained.
    #[error("host SDK unavailable: {0}")]
    Unavailable(String),

    /// A host call (`context`, `metadata`, `get`, `invoke`) failed.
    #[error("host call {method} failed: {message}")]
    Call { method: String, message: String },

    /// The proxied request completed with a non-success status.
    #[error("request failed with status {status}")]
    Status { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl HostError {
    pub fn call(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Call {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Returns the backend's `{"error": "..."}` message for a failed request.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        let HostError::Status { body, .. } = self else {
            return None;
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value.get("error")?.as_str().map(str::to_string)
    }

    /// Returns the HTTP status for a failed request.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            HostError::Status { status, .. } => Some(*status),
            HostError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
