//! URL parameter reconciliation.
//!
//! The backend renders every page from the recognized query parameters, so
//! they must survive reloads and in-app navigation. The reconciler fills in
//! whatever the current URL lacks, preferring (in order) the URL itself, the
//! cached parameter set, and values derived from the session.

use crate::error::SessionResult;
use crate::url_params::{params_from_url, set_query_param};
use healthcheck_cache::BlobCache;
use healthcheck_types::{SessionData, UrlParam, UrlParams};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Cache entry holding the last reconciled parameter set.
pub const URL_PARAMS_CACHE_KEY: &str = "zaf_url_params";

/// Outcome of [`UrlParamReconciler::reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileResult {
    /// The URL already carries every knowable parameter.
    Proceed,
    /// The page must navigate here and run nothing else.
    Navigate(Url),
}

impl ReconcileResult {
    #[must_use]
    pub fn navigated(&self) -> bool {
        matches!(self, Self::Navigate(_))
    }

    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        match self {
            Self::Navigate(url) => Some(url),
            Self::Proceed => None,
        }
    }
}

/// Keeps the recognized URL parameters converged across page loads.
#[derive(Debug, Clone)]
pub struct UrlParamReconciler {
    cache: BlobCache,
    ttl: Duration,
}

impl UrlParamReconciler {
    pub fn new(cache: BlobCache, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Fills in missing parameters on `current`.
    ///
    /// A parameter already present in the URL is never overwritten. The
    /// reconciled set is cached either way, refreshing its TTL.
    pub fn reconcile(&self, session: &SessionData, current: &Url) -> ReconcileResult {
        let present = params_from_url(current);
        let cached = self.cached();

        let mut reconciled = present.clone();
        let mut target = current.clone();
        let mut added = Vec::new();

        for param in UrlParam::ALL {
            if present.contains(param) {
                continue;
            }
            let candidate = cached
                .get(param)
                .filter(|value| !value.trim().is_empty())
                .map(str::to_string)
                .or_else(|| session.derived_param(param));
            let Some(value) = candidate else {
                continue;
            };
            if reconciled.set(param, value.as_str()) {
                set_query_param(&mut target, param.as_str(), &value);
                added.push(param.as_str());
            }
        }

        self.persist(&reconciled);

        if added.is_empty() {
            debug!("URL parameters complete");
            ReconcileResult::Proceed
        } else {
            info!("Redirecting to add URL parameters: {}", added.join(", "));
            ReconcileResult::Navigate(target)
        }
    }

    /// Returns cached parameters overlaid with those in `current`.
    ///
    /// The merged set is re-cached only when `current` carries parameters of
    /// its own.
    pub fn params(&self, current: &Url) -> UrlParams {
        let present = params_from_url(current);
        let mut combined = self.cached();
        combined.merge(&present);
        if !present.is_empty() {
            self.persist(&combined);
        }
        combined
    }

    /// Resolves `path` against `current` and carries every known parameter
    /// onto the result.
    pub fn link_with_params(&self, current: &Url, path: &str) -> SessionResult<Url> {
        let mut link = current.join(path)?;
        for (param, value) in self.params(current).iter() {
            set_query_param(&mut link, param.as_str(), value);
        }
        Ok(link)
    }

    fn cached(&self) -> UrlParams {
        self.cache
            .get::<UrlParams>(URL_PARAMS_CACHE_KEY)
            .unwrap_or_default()
    }

    fn persist(&self, params: &UrlParams) {
        if let Err(e) = self.cache.put(URL_PARAMS_CACHE_KEY, params, self.ttl) {
            warn!("Failed to cache URL parameters: {e}");
        }
    }
}
