//! Session management for the Health Check ZAF app.
//!
//! A page load goes through two steps before any feature code runs:
//!
//! 1. **Initialize**: [`SessionManager`] obtains a host SDK handle (with
//!    bounded, fixed-delay retries), then builds a [`Session`] either from a
//!    cached snapshot or from fresh host calls, and replicates fresh
//!    snapshots to the backend in the background.
//! 2. **Reconcile**: [`UrlParamReconciler`] makes sure the page URL carries
//!    every recognized parameter it can know. If something was missing it
//!    returns [`ReconcileResult::Navigate`]; the caller performs the
//!    navigation and stops.
//!
//! # Example
//!
//! ```no_run
//! use healthcheck_cache::{BlobCache, MemoryStore, SystemClock};
//! use healthcheck_host::{HostFixture, ProxyClient, StaticHostFactory};
//! use healthcheck_session::{ReconcileResult, SessionConfig, SessionManager, UrlParamReconciler};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let fixture = HostFixture::load("host.json")?;
//! let factory = Arc::new(StaticHostFactory::new(fixture, ProxyClient::new()?));
//! let cache = BlobCache::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock));
//! let config = SessionConfig::default();
//!
//! let page_url = url::Url::parse("https://app.example.com/app/")?;
//! let manager = SessionManager::new(factory, cache.clone(), config.clone());
//! let session = manager.initialize(&page_url).await?;
//!
//! let reconciler = UrlParamReconciler::new(cache, config.params_ttl());
//! if let ReconcileResult::Navigate(url) = reconciler.reconcile(session.data(), &page_url) {
//!     println!("navigate to {url}");
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod manager;
mod reconcile;
mod replicate;
mod url_params;

pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use manager::{session_cache_key, Session, SessionManager};
pub use reconcile::{ReconcileResult, UrlParamReconciler, URL_PARAMS_CACHE_KEY};
pub use replicate::{BackendReplicator, SessionReplicator};
pub use url_params::{params_from_url, set_query_param};
