//! Best-effort copy of the session into the backend's cache.

use async_trait::async_trait;
use healthcheck_host::{HostClient, HostResult, RequestOptions};
use healthcheck_types::{AppMetadata, HostContext, SessionData, UserId, UserInfo};
use serde::Serialize;

/// Pushes a freshly fetched session somewhere outside the page.
#[async_trait]
pub trait SessionReplicator: Send + Sync {
    async fn replicate(&self, client: &dyn HostClient, data: &SessionData) -> HostResult<()>;
}

#[derive(Serialize)]
struct ReplicationPayload<'a> {
    user_id: UserId,
    metadata: &'a AppMetadata,
    context: &'a HostContext,
    user_info: &'a UserInfo,
}

/// Posts the session to the backend's `cache-zaf-data` endpoint through the
/// host's request proxy.
#[derive(Debug, Clone)]
pub struct BackendReplicator {
    endpoint: String,
}

impl BackendReplicator {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SessionReplicator for BackendReplicator {
    async fn replicate(&self, client: &dyn HostClient, data: &SessionData) -> HostResult<()> {
        let payload = ReplicationPayload {
            user_id: data.user_info.id,
            metadata: &data.metadata,
            context: &data.context,
            user_info: &data.user_info,
        };
        let options = RequestOptions::post_json(&self.endpoint, &payload)?.secure();
        client.request(options).await?;
        Ok(())
    }
}
