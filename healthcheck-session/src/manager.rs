//! Session initialization.

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::replicate::SessionReplicator;
use crate::url_params::params_from_url;
use healthcheck_cache::BlobCache;
use healthcheck_host::{HostClient, HostFactory, InitOptions};
use healthcheck_types::{
    subdomain_from_origin, AppMetadata, HostContext, InstallationId, SessionData, UrlParam,
    UserInfo,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use url::Url;

/// Cache key of a session snapshot for one installation on one account.
#[must_use]
pub fn session_cache_key(installation_id: &str, subdomain: &str) -> String {
    format!("session:{installation_id}:{subdomain}")
}

fn cache_key(installation_id: Option<String>, subdomain: Option<&str>) -> Option<String> {
    let installation_id = installation_id.filter(|id| !id.trim().is_empty())?;
    let subdomain = subdomain.filter(|s| !s.trim().is_empty())?;
    Some(session_cache_key(&installation_id, subdomain))
}

/// A fully populated page session.
///
/// Built once per page load and handed to feature code explicitly.
#[derive(Clone)]
pub struct Session {
    client: Arc<dyn HostClient>,
    data: SessionData,
    from_cache: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("data", &self.data)
            .field("from_cache", &self.from_cache)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(client: Arc<dyn HostClient>, data: SessionData) -> Self {
        Self {
            client,
            data,
            from_cache: false,
        }
    }

    /// The host SDK handle.
    #[must_use]
    pub fn client(&self) -> &Arc<dyn HostClient> {
        &self.client
    }

    #[must_use]
    pub fn data(&self) -> &SessionData {
        &self.data
    }

    #[must_use]
    pub fn context(&self) -> &HostContext {
        &self.data.context
    }

    #[must_use]
    pub fn metadata(&self) -> &AppMetadata {
        &self.data.metadata
    }

    #[must_use]
    pub fn user_info(&self) -> &UserInfo {
        &self.data.user_info
    }

    #[must_use]
    pub fn installation_id(&self) -> Option<InstallationId> {
        self.data.installation_id()
    }

    #[must_use]
    pub fn subdomain(&self) -> Option<&str> {
        self.data.subdomain()
    }

    /// True if the data came from the local cache rather than the host.
    #[must_use]
    pub fn is_from_cache(&self) -> bool {
        self.from_cache
    }
}

/// Builds [`Session`]s from the host SDK.
pub struct SessionManager {
    factory: Arc<dyn HostFactory>,
    cache: BlobCache,
    config: SessionConfig,
    replicator: Option<Arc<dyn SessionReplicator>>,
    replications: Mutex<JoinSet<()>>,
}

impl SessionManager {
    pub fn new(factory: Arc<dyn HostFactory>, cache: BlobCache, config: SessionConfig) -> Self {
        Self {
            factory,
            cache,
            config,
            replicator: None,
            replications: Mutex::new(JoinSet::new()),
        }
    }

    /// Enables background replication of freshly fetched sessions.
    ///
    /// Replications run on the runtime and are owned by the manager: call
    /// [`SessionManager::flush`] before shutting down, since dropping the
    /// manager aborts any still running.
    #[must_use]
    pub fn with_replicator(mut self, replicator: Arc<dyn SessionReplicator>) -> Self {
        self.replicator = Some(replicator);
        self
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Initializes a session with the configured retry budget.
    pub async fn initialize(&self, page_url: &Url) -> SessionResult<Session> {
        self.initialize_with(page_url, self.config.retry_count, self.config.retry_delay())
            .await
    }

    /// Initializes a session.
    ///
    /// Makes up to `retry_count` attempts, each preceded by `delay`. An
    /// attempt obtains the SDK and then either finds a cached snapshot for the
    /// page's `(installation_id, subdomain)` or fetches context and metadata
    /// together, then the current user. A failure in either step uses up the
    /// attempt; the last failure is returned.
    pub async fn initialize_with(
        &self,
        page_url: &Url,
        retry_count: u32,
        delay: Duration,
    ) -> SessionResult<Session> {
        let url_params = params_from_url(page_url);
        let options = InitOptions::from_params(&url_params);
        let page_key = cache_key(
            url_params.get(UrlParam::InstallationId).map(str::to_string),
            url_params
                .get(UrlParam::Origin)
                .and_then(subdomain_from_origin)
                .as_deref(),
        );

        let mut last_error = SessionError::Initialization {
            attempts: retry_count,
            reason: String::from("no initialization attempts were made"),
        };

        for attempt in 1..=retry_count {
            tokio::time::sleep(delay).await;

            let client = match self.factory.init(&options) {
                Ok(client) => client,
                Err(e) => {
                    warn!("ZAF initialization attempt {attempt} failed: {e}");
                    last_error = SessionError::Initialization {
                        attempts: retry_count,
                        reason: e.to_string(),
                    };
                    continue;
                }
            };

            if let Some(session) = self.cached(&client, page_key.as_deref()) {
                info!("ZAF client initialized on attempt {attempt}");
                return Ok(session);
            }

            match fetch(client.as_ref()).await {
                Ok(data) => {
                    info!("ZAF client initialized on attempt {attempt}");
                    self.store(&data);
                    self.replicate(&client, &data);
                    return Ok(Session::new(client, data));
                }
                Err(e) => {
                    warn!("ZAF initialization attempt {attempt} failed: {e}");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    /// Waits up to `timeout` for background replications to finish.
    ///
    /// Returns true if none were left running. Anything still in flight when
    /// the timeout expires is aborted.
    pub async fn flush(&self, timeout: Duration) -> bool {
        let mut pending = match self.replications.lock() {
            Ok(mut replications) => std::mem::take(&mut *replications),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        if pending.is_empty() {
            return true;
        }

        debug!("Waiting for {} session replication(s)", pending.len());
        let drained = tokio::time::timeout(timeout, async {
            while let Some(joined) = pending.join_next().await {
                if let Err(e) = joined {
                    warn!("Session replication task failed: {e}");
                }
            }
        })
        .await;

        if drained.is_err() {
            warn!(
                "Abandoning {} session replication(s) after {timeout:?}",
                pending.len()
            );
            pending.abort_all();
            return false;
        }
        true
    }

    fn cached(&self, client: &Arc<dyn HostClient>, key: Option<&str>) -> Option<Session> {
        let Some(key) = key else {
            debug!("Session cache bypassed: installation id or subdomain unknown");
            return None;
        };
        match self.cache.get::<SessionData>(key) {
            Some(data) => {
                debug!("Session loaded from cache ({key})");
                Some(Session {
                    client: Arc::clone(client),
                    data,
                    from_cache: true,
                })
            }
            None => {
                debug!("Session cache miss ({key})");
                None
            }
        }
    }

    fn store(&self, data: &SessionData) {
        let key = cache_key(
            data.installation_id().map(|id| id.to_string()),
            data.subdomain(),
        );
        let Some(key) = key else {
            debug!("Session not cached: installation id or subdomain unknown");
            return;
        };
        if let Err(e) = self.cache.put(&key, data, self.config.session_ttl()) {
            warn!("Failed to cache session ({key}): {e}");
        }
    }

    fn replicate(&self, client: &Arc<dyn HostClient>, data: &SessionData) {
        let Some(replicator) = self.replicator.clone() else {
            return;
        };
        let client = Arc::clone(client);
        let data = data.clone();
        let task = async move {
            match replicator.replicate(client.as_ref(), &data).await {
                Ok(()) => debug!("Session replicated to backend"),
                Err(e) => warn!("Session replication failed: {e}"),
            }
        };
        match self.replications.lock() {
            Ok(mut replications) => {
                replications.spawn(task);
            }
            Err(poisoned) => {
                poisoned.into_inner().spawn(task);
            }
        }
    }
}

async fn fetch(client: &dyn HostClient) -> SessionResult<SessionData> {
    let (context, metadata) = tokio::try_join!(client.context(), client.metadata())?;
    let user_info = client.current_user().await?;
    Ok(SessionData {
        context,
        metadata,
        user_info,
    })
}
