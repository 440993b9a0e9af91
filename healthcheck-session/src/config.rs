//! Session timing and cache lifetimes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for [`crate::SessionManager`] and [`crate::UrlParamReconciler`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Host SDK initialization attempts before giving up.
    pub retry_count: u32,
    /// Wait before each initialization attempt (ms).
    pub retry_delay_ms: u64,
    /// Lifetime of a cached session snapshot (seconds).
    pub session_ttl_secs: u64,
    /// Lifetime of the cached URL parameter set (seconds).
    pub params_ttl_secs: u64,
    /// Backend path that receives replicated sessions.
    pub replicate_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            retry_count: 3,
            retry_delay_ms: 100,
            session_ttl_secs: 5 * 60,
            params_ttl_secs: 30 * 60,
            replicate_path: "/cache-zaf-data/".to_string(),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    #[must_use]
    pub fn params_ttl(&self) -> Duration {
        Duration::from_secs(self.params_ttl_secs)
    }
}
