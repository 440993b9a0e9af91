//! The host SDK traits.

use crate::error::{HostError, HostResult};
use crate::request::{FrameSize, HostResponse, RequestOptions};
use async_trait::async_trait;
use healthcheck_types::{AppMetadata, HostContext, UrlParam, UrlParams, UserInfo};
use std::sync::Arc;

/// Arguments for the SDK `init()` call.
///
/// Outside the normal iframe bootstrap the SDK needs the parent origin and
/// app guid to find its host; otherwise it is initialized bare.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitOptions {
    pub origin: Option<String>,
    pub app_guid: Option<String>,
}

impl InitOptions {
    /// Bare `init()`.
    #[must_use]
    pub fn bare() -> Self {
        Self::default()
    }

    /// `init({origin, appGuid})` when both are present, bare otherwise.
    #[must_use]
    pub fn from_params(params: &UrlParams) -> Self {
        match (params.get(UrlParam::Origin), params.get(UrlParam::AppGuid)) {
            (Some(origin), Some(app_guid)) => Self {
                origin: Some(origin.to_string()),
                app_guid: Some(app_guid.to_string()),
            },
            _ => Self::bare(),
        }
    }

    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.origin.is_none() && self.app_guid.is_none()
    }
}

/// An initialized host SDK handle.
#[async_trait]
pub trait HostClient: Send + Sync {
    /// Account and instance context.
    async fn context(&self) -> HostResult<HostContext>;

    /// App installation metadata.
    async fn metadata(&self) -> HostResult<AppMetadata>;

    /// Generic property lookup; the result is keyed by `path`.
    async fn get(&self, path: &str) -> HostResult<serde_json::Value>;

    /// Resizes the hosting iframe.
    async fn invoke_resize(&self, size: FrameSize) -> HostResult<()>;

    /// Performs a proxied HTTP request. Non-success statuses are errors.
    async fn request(&self, options: RequestOptions) -> HostResult<HostResponse>;

    /// The signed-in agent, via `get("currentUser")`.
    async fn current_user(&self) -> HostResult<UserInfo> {
        let value = self.get("currentUser").await?;
        let user = value
            .get("currentUser")
            .cloned()
            .ok_or_else(|| HostError::call("get", "response has no currentUser"))?;
        Ok(serde_json::from_value(user)?)
    }
}

/// The SDK entry point. Each call is one initialization attempt.
pub trait HostFactory: Send + Sync {
    fn init(&self, options: &InitOptions) -> HostResult<Arc<dyn HostClient>>;
}
