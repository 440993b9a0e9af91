//! Support chat widget injection.

use crate::backend::Backend;
use crate::config::AppConfig;
use crate::error::AppResult;
use crate::view::ResultsView;
use healthcheck_session::Session;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ChatWidgetController {
    backend: Backend,
    view: Arc<dyn ResultsView>,
}

impl ChatWidgetController {
    pub fn new(session: &Session, config: &AppConfig, view: Arc<dyn ResultsView>) -> Self {
        Self {
            backend: Backend::from_config(session.client().clone(), config),
            view,
        }
    }

    /// Appends the widget script when the backend has chat enabled.
    ///
    /// Returns whether a script was injected. Failures are not rendered.
    pub async fn load(&self) -> AppResult<bool> {
        let widget = match self.backend.chat_widget().await {
            Ok(widget) => widget,
            Err(e) => {
                warn!("Chat widget unavailable: {e}");
                return Err(e);
            }
        };
        if !widget.is_enabled || widget.script.trim().is_empty() {
            debug!("Chat widget disabled");
            return Ok(false);
        }
        self.view
            .append_html(&format!("<script>{}</script>", widget.script));
        Ok(true)
    }
}
