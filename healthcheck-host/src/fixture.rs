//! A host backed by a JSON fixture, for running the app outside Zendesk.
//!
//! Context, metadata and the current user come from the fixture; requests
//! are executed for real through [`ProxyClient`], with secure settings
//! substituted from the fixture's installation settings.

use crate::client::{HostClient, HostFactory, InitOptions};
use crate::error::{HostError, HostResult};
use crate::proxy::ProxyClient;
use crate::request::{FrameSize, HostResponse, RequestOptions};
use async_trait::async_trait;
use healthcheck_types::{AppMetadata, HostContext, UserInfo};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// What a static host reports about its installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostFixture {
    pub context: HostContext,
    pub metadata: AppMetadata,
    pub current_user: UserInfo,
}

impl HostFixture {
    /// Loads a fixture from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> HostResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// An initialized fixture host.
pub struct StaticHost {
    fixture: HostFixture,
    proxy: ProxyClient,
    resizes: Mutex<Vec<FrameSize>>,
}

impl StaticHost {
    #[must_use]
    pub fn new(fixture: HostFixture, proxy: ProxyClient) -> Self {
        Self {
            fixture,
            proxy,
            resizes: Mutex::new(Vec::new()),
        }
    }

    /// Every resize requested so far, oldest first.
    pub fn resizes(&self) -> Vec<FrameSize> {
        self.resizes
            .lock()
            .map(|sizes| sizes.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl HostClient for StaticHost {
    async fn context(&self) -> HostResult<HostContext> {
        Ok(self.fixture.context.clone())
    }

    async fn metadata(&self) -> HostResult<AppMetadata> {
        Ok(self.fixture.metadata.clone())
    }

    async fn get(&self, path: &str) -> HostResult<serde_json::Value> {
        match path {
            "currentUser" => Ok(serde_json::json!({
                "currentUser": serde_json::to_value(&self.fixture.current_user)?
            })),
            other => Err(HostError::call("get", format!("unsupported path {other}"))),
        }
    }

    async fn invoke_resize(&self, size: FrameSize) -> HostResult<()> {
        debug!("resize to {}x{}", size.width, size.height);
        self.resizes
            .lock()
            .map_err(|_| HostError::call("invoke", "resize log poisoned"))?
            .push(size);
        Ok(())
    }

    async fn request(&self, options: RequestOptions) -> HostResult<HostResponse> {
        let options = if options.secure {
            options.with_settings_substituted(&self.fixture.metadata.settings)
        } else {
            options
        };
        self.proxy.execute(&options).await
    }
}

/// Factory that always yields a fresh [`StaticHost`] for its fixture.
pub struct StaticHostFactory {
    fixture: HostFixture,
    proxy: ProxyClient,
}

impl StaticHostFactory {
    #[must_use]
    pub fn new(fixture: HostFixture, proxy: ProxyClient) -> Self {
        Self { fixture, proxy }
    }
}

impl HostFactory for StaticHostFactory {
    fn init(&self, options: &InitOptions) -> HostResult<Arc<dyn HostClient>> {
        if options.is_bare() {
            info!("Initializing static host");
        } else {
            info!(
                "Initializing static host for origin {}",
                options.origin.as_deref().unwrap_or("-")
            );
        }
        Ok(Arc::new(StaticHost::new(
            self.fixture.clone(),
            self.proxy.clone(),
        )))
    }
}
