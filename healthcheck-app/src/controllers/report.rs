//! Historical report viewer.

use crate::backend::Backend;
use crate::config::AppConfig;
use crate::error::AppResult;
use crate::filters::FilterStore;
use crate::frame::FrameBand;
use crate::view::{error_panel, loading_panel, ResultsView};
use healthcheck_session::Session;
use std::sync::Arc;
use tracing::{error, info};

pub struct ReportController {
    session: Session,
    backend: Backend,
    view: Arc<dyn ResultsView>,
    frame: FrameBand,
    filters: Option<FilterStore>,
}

impl ReportController {
    pub fn new(session: Session, config: &AppConfig, view: Arc<dyn ResultsView>) -> Self {
        let backend = Backend::from_config(session.client().clone(), config);
        Self {
            session,
            backend,
            view,
            frame: FrameBand::from_config(config),
            filters: None,
        }
    }

    /// Restores saved issue filters once the report renders.
    #[must_use]
    pub fn with_filters(mut self, filters: FilterStore) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Loads and renders a stored report.
    pub async fn show(&self, report_id: u64) -> AppResult<()> {
        self.view.set_html(&loading_panel());
        info!("Loading report {report_id}");

        let result = self.backend.report(report_id).await;
        match &result {
            Ok(html) => {
                self.view.set_html(html);
                if let Some(filters) = &self.filters {
                    filters.restore(self.view.as_ref());
                }
            }
            Err(e) => {
                error!("Failed to load report {report_id}: {e}");
                self.view
                    .set_html(&error_panel("Error Loading Report", &e.user_message()));
            }
        }

        self.frame
            .resize_to_fit(self.session.client().as_ref(), self.view.as_ref())
            .await;
        result.map(|_| ())
    }
}
