//! App error types.

use healthcheck_host::HostError;
use healthcheck_session::SessionError;
use std::time::Duration;
use thiserror::Error;

/// Result type for controller operations.
pub type AppResult<T> = Result<T, AppError>;

/// Errors raised by feature controllers.
///
/// Everything except [`AppError::Session`] is caught at the controller
/// boundary and rendered inline.
#[derive(Debug, Error)]
pub enum AppError {
    /// A backend call through the host proxy failed.
    #[error("network error: {0}")]
    Network(#[from] HostError),

    /// The backend answered but reported a failure.
    #[error("backend error: {0}")]
    Backend(String),

    /// User input was rejected before any network call.
    #[error("{0}")]
    Validation(String),

    /// A status poll gave up.
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The page session could not be established.
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AppError {
    /// The message shown to the user.
    ///
    /// Prefers the backend's `{"error": ...}` text for failed requests.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(e) => e.error_message().unwrap_or_else(|| e.to_string()),
            AppError::Backend(message) | AppError::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }
}
