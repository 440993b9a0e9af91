//! App configuration.

use crate::error::{AppError, AppResult};
use healthcheck_session::SessionConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable selecting the backend environment.
pub const ENV_ENVIRONMENT: &str = "HEALTHCHECK_ENVIRONMENT";
/// Environment variable overriding the backend base URL.
pub const ENV_BACKEND_URL: &str = "HEALTHCHECK_BACKEND_URL";

/// Backend deployment the app talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl Environment {
    /// Base URL of the backend for this environment.
    #[must_use]
    pub const fn backend_url(&self) -> &'static str {
        match self {
            Self::Production => "https://gcx-healthcheck-zd-production.up.railway.app",
            Self::Development => "https://gcx-healthcheck-zd-development.up.railway.app",
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            other => Err(AppError::Config(format!("unknown environment: {other}"))),
        }
    }
}

/// Settings for the feature controllers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub environment: Environment,
    /// Overrides the environment's backend URL when set.
    pub backend_base_url: Option<String>,
    /// Interval between status polls (ms).
    pub poll_interval_ms: u64,
    /// Wall-clock cap on health check task polling (seconds).
    pub task_timeout_secs: u64,
    /// Maximum unlock status polls per payment window.
    pub unlock_max_attempts: u32,
    /// Interval between payment window checks (ms).
    pub window_check_interval_ms: u64,
    pub frame_min_height: u32,
    pub frame_max_height: u32,
    pub session: SessionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            backend_base_url: None,
            poll_interval_ms: 2_000,
            task_timeout_secs: 5 * 60,
            unlock_max_attempts: 150,
            window_check_interval_ms: 1_000,
            frame_min_height: 600,
            frame_max_height: 800,
            session: SessionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with `HEALTHCHECK_ENVIRONMENT` and
    /// `HEALTHCHECK_BACKEND_URL`. Empty variables are ignored.
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();
        if let Some(environment) = env_var(ENV_ENVIRONMENT) {
            config.environment = environment.parse()?;
        }
        if let Some(url) = env_var(ENV_BACKEND_URL) {
            url::Url::parse(&url)
                .map_err(|e| AppError::Config(format!("{ENV_BACKEND_URL}: {e}")))?;
            config.backend_base_url = Some(url);
        }
        Ok(config)
    }

    /// Backend base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.backend_base_url
            .as_deref()
            .unwrap_or(self.environment.backend_url())
            .trim_end_matches('/')
    }

    /// Full URL of a backend path.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn task_timeout(&self) -> Duration {
        Duration::from_secs(self.task_timeout_secs)
    }

    #[must_use]
    pub fn window_check_interval(&self) -> Duration {
        Duration::from_millis(self.window_check_interval_ms)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
