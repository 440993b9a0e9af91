//! Page bootstrap: session, URL parameters, initial frame size.

use crate::error::AppResult;
use crate::frame::FrameBand;
use crate::view::{full_page_error, ResultsView};
use healthcheck_session::{ReconcileResult, Session, SessionManager, UrlParamReconciler};
use tracing::{error, info, warn};
use url::Url;

/// What the page should do after bootstrap.
#[derive(Debug)]
pub enum PageStart {
    /// Navigate here and run nothing else.
    Navigate(Url),
    /// The URL is complete; feature code may run with this session.
    Ready(Session),
}

/// Initializes the session and reconciles the page URL.
///
/// An initialization failure is rendered as a full-page error and returned.
pub async fn bootstrap(
    manager: &SessionManager,
    reconciler: &UrlParamReconciler,
    page_url: &Url,
    view: &dyn ResultsView,
    frame: &FrameBand,
) -> AppResult<PageStart> {
    let session = match manager.initialize(page_url).await {
        Ok(session) => session,
        Err(e) => {
            error!("Error initializing: {e}");
            view.set_html(&full_page_error(&e.to_string()));
            return Err(e.into());
        }
    };

    if let ReconcileResult::Navigate(target) = reconciler.reconcile(session.data(), page_url) {
        info!("Navigating to {target}");
        return Ok(PageStart::Navigate(target));
    }

    if let Err(e) = session.client().invoke_resize(frame.initial()).await {
        warn!("Initial resize failed: {e}");
    }
    Ok(PageStart::Ready(session))
}
