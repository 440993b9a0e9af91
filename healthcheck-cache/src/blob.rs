//! Typed TTL blobs.

use crate::clock::Clock;
use crate::error::CacheResult;
use crate::store::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Namespace prefix applied to every key written by [`BlobCache`].
const DEFAULT_NAMESPACE: &str = "healthcheck";

/// A cached value together with its absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedBlob<T> {
    pub value: T,
    /// Epoch milliseconds after which the blob is stale.
    pub expiry: i64,
}

impl<T> CachedBlob<T> {
    /// Wraps `value` so it expires `ttl` after `now_millis`.
    pub fn new(value: T, now_millis: i64, ttl: Duration) -> Self {
        let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        Self {
            value,
            expiry: now_millis.saturating_add(ttl_millis),
        }
    }

    /// A blob is expired strictly after its expiry instant.
    #[must_use]
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        now_millis > self.expiry
    }
}

/// Namespaced, typed TTL cache over a [`KeyValueStore`].
///
/// Reads never fail: unreadable, corrupt or expired entries are logged,
/// removed and reported as absent.
#[derive(Clone)]
pub struct BlobCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    namespace: String,
}

impl std::fmt::Debug for BlobCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobCache")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl BlobCache {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_namespace(store, clock, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            store,
            clock,
            namespace: namespace.into(),
        }
    }

    /// Returns the fully qualified store key for `name`.
    #[must_use]
    pub fn key(&self, name: &str) -> String {
        format!("{}:{}", self.namespace, name)
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Reads a live value, evicting it if it has expired or cannot be parsed.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let key = self.key(name);
        let raw = match self.store.get_item(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Cache read error for {key}: {e}");
                return None;
            }
        };

        let blob: CachedBlob<T> = match serde_json::from_str(&raw) {
            Ok(blob) => blob,
            Err(e) => {
                warn!("Discarding unreadable cache entry {key}: {e}");
                self.evict(&key);
                return None;
            }
        };

        if blob.is_expired_at(self.clock.now_millis()) {
            debug!("Cache entry {key} expired");
            self.evict(&key);
            return None;
        }

        Some(blob.value)
    }

    /// Writes `value` with the given time-to-live, replacing any previous entry.
    pub fn put<T: Serialize>(&self, name: &str, value: &T, ttl: Duration) -> CacheResult<()> {
        let blob = CachedBlob::new(value, self.clock.now_millis(), ttl);
        let raw = serde_json::to_string(&blob)?;
        self.store.set_item(&self.key(name), &raw)
    }

    pub fn remove(&self, name: &str) -> CacheResult<()> {
        self.store.remove_item(&self.key(name))
    }

    fn evict(&self, key: &str) {
        if let Err(e) = self.store.remove_item(key) {
            warn!("Failed to evict cache entry {key}: {e}");
        }
    }
}
