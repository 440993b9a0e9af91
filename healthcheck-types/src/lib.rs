//! Core type definitions for the Health Check ZAF client.
//!
//! This crate defines the plain data shared by every other crate:
//! - Installation and user identifiers
//! - Host context, app metadata and current-user info as returned by the ZAF SDK
//! - The cacheable session snapshot
//! - The recognized URL parameter set
//!
//! Nothing here performs I/O.

mod ids;
mod params;
mod session;

pub use ids::{InstallationId, UserId};
pub use params::{UrlParam, UrlParams};
pub use session::{
    origin_for_subdomain, subdomain_from_origin, AccountContext, AppMetadata, HostContext, Plan,
    SessionData, UserInfo, DEFAULT_PLAN,
};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid id: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("unknown URL parameter: {0}")]
    UnknownParam(String),
}
