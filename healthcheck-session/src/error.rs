//! Session error types.

use healthcheck_host::HostError;
use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that abort page initialization.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The host SDK could not be obtained within the retry budget.
    #[error("host SDK could not be initialized after {attempts} attempts: {reason}")]
    Initialization { attempts: u32, reason: String },

    /// The SDK came up but a context, metadata or user lookup failed.
    #[error("failed to load session from host: {0}")]
    Fetch(#[from] HostError),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
