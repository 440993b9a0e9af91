//! Shared fakes for session tests.

#![allow(dead_code)]

use async_trait::async_trait;
use healthcheck_cache::{BlobCache, ManualClock, MemoryStore};
use healthcheck_host::{
    FrameSize, HostClient, HostError, HostFactory, HostResponse, HostResult, InitOptions,
    RequestOptions,
};
use healthcheck_session::SessionReplicator;
use healthcheck_types::{
    AccountContext, AppMetadata, HostContext, InstallationId, Plan, SessionData, UserId, UserInfo,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

pub const T0: i64 = 1_700_000_000_000;

/// Session data for installation 123 on `acme`, plan `Pro`, user 55.
pub fn acme_data() -> SessionData {
    SessionData {
        context: HostContext {
            account: AccountContext {
                subdomain: "acme".into(),
            },
            instance_guid: Some("instance-1".into()),
            ..Default::default()
        },
        metadata: AppMetadata {
            installation_id: Some(InstallationId::new(123)),
            app_guid: Some("app-guid".into()),
            plan: Some(Plan { name: "Pro".into() }),
            ..Default::default()
        },
        user_info: UserInfo {
            id: UserId::new(55),
            name: "Agent".into(),
            email: "agent@acme.test".into(),
            role: "admin".into(),
            locale: "en-US".into(),
        },
    }
}

pub fn memory_cache() -> (BlobCache, Arc<MemoryStore>, Arc<ManualClock>) {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(T0));
    (BlobCache::new(store.clone(), clock.clone()), store, clock)
}

/// A host that serves fixed data and counts lookups.
pub struct FakeHost {
    pub data: SessionData,
    pub lookups: AtomicU32,
    /// Number of upcoming `metadata()` calls that fail.
    pub metadata_failures: AtomicU32,
    pub requests: Mutex<Vec<RequestOptions>>,
}

impl FakeHost {
    pub fn new(data: SessionData) -> Self {
        Self {
            data,
            lookups: AtomicU32::new(0),
            metadata_failures: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_metadata(self, failures: u32) -> Self {
        self.metadata_failures.store(failures, Ordering::SeqCst);
        self
    }

    pub fn lookups(&self) -> u32 {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RequestOptions> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostClient for FakeHost {
    async fn context(&self) -> HostResult<HostContext> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.data.context.clone())
    }

    async fn metadata(&self) -> HostResult<AppMetadata> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .metadata_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(HostError::call("metadata", "iframe detached"));
        }
        Ok(self.data.metadata.clone())
    }

    async fn get(&self, path: &str) -> HostResult<serde_json::Value> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        assert_eq!(path, "currentUser");
        Ok(serde_json::json!({ "currentUser": self.data.user_info }))
    }

    async fn invoke_resize(&self, _size: FrameSize) -> HostResult<()> {
        Ok(())
    }

    async fn request(&self, options: RequestOptions) -> HostResult<HostResponse> {
        self.requests.lock().unwrap().push(options);
        Ok(HostResponse::new(200, r#"{"success": true}"#))
    }
}

/// A factory that fails a fixed number of times before succeeding.
pub struct FlakyFactory {
    pub host: Arc<FakeHost>,
    failures_left: AtomicU32,
    pub attempts: AtomicU32,
    pub last_options: Mutex<Option<InitOptions>>,
}

impl FlakyFactory {
    pub fn new(host: Arc<FakeHost>, failures: u32) -> Self {
        Self {
            host,
            failures_left: AtomicU32::new(failures),
            attempts: AtomicU32::new(0),
            last_options: Mutex::new(None),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl HostFactory for FlakyFactory {
    fn init(&self, options: &InitOptions) -> HostResult<Arc<dyn HostClient>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        *self.last_options.lock().unwrap() = Some(options.clone());
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            return Err(HostError::Unavailable("ZAFClient not loaded".into()));
        }
        Ok(self.host.clone())
    }
}

/// Forwards every replicated session to a channel; optionally fails after.
pub struct RecordingReplicator {
    pub tx: mpsc::UnboundedSender<SessionData>,
    pub fail: bool,
}

#[async_trait]
impl SessionReplicator for RecordingReplicator {
    async fn replicate(&self, _client: &dyn HostClient, data: &SessionData) -> HostResult<()> {
        let _ = self.tx.send(data.clone());
        if self.fail {
            return Err(HostError::Status {
                status: 500,
                body: "boom".into(),
            });
        }
        Ok(())
    }
}

/// Takes `delay` to replicate, then counts the session as delivered.
pub struct SlowReplicator {
    pub delay: Duration,
    pub delivered: AtomicU32,
}

impl SlowReplicator {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            delivered: AtomicU32::new(0),
        }
    }

    pub fn delivered(&self) -> u32 {
        self.delivered.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionReplicator for SlowReplicator {
    async fn replicate(&self, _client: &dyn HostClient, _data: &SessionData) -> HostResult<()> {
        tokio::time::sleep(self.delay).await;
        self.delivered.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
