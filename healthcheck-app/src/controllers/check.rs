//! Run-check controller.

use crate::backend::{Backend, CheckRequest, CheckStart, TaskState};
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::filters::FilterStore;
use crate::frame::FrameBand;
use crate::poll::{PollConfig, PollStop, PollTask, Tick};
use crate::view::{error_panel, loading_panel, timeout_panel, ResultsView};
use healthcheck_session::Session;
use healthcheck_types::SessionData;
use std::sync::Arc;
use tracing::{error, info, warn};

const ERROR_TITLE: &str = "Error Running Health Check";

/// Body of the check request for this session.
///
/// Credentials are sent as setting placeholders that the host fills in on
/// secure requests.
#[must_use]
pub fn check_request(data: &SessionData) -> CheckRequest {
    let subdomain = data.subdomain().unwrap_or_default().to_string();
    CheckRequest {
        url: format!("{subdomain}.zendesk.com"),
        email: "{{setting.admin_email}}".to_string(),
        api_token: "{{setting.api_token}}".to_string(),
        instance_guid: data.context.instance_guid.clone(),
        app_guid: data.metadata.app_guid.clone(),
        installation_id: data.installation_id().map(|id| id.get()),
        subdomain,
        plan: data.metadata.plan_name().to_string(),
        version: data.metadata.version.clone(),
        user_id: data.user_info.id.get(),
    }
}

/// Starts a health check and renders its results.
pub struct CheckController {
    session: Session,
    backend: Backend,
    view: Arc<dyn ResultsView>,
    frame: FrameBand,
    poll: PollConfig,
    filters: Option<FilterStore>,
}

impl CheckController {
    pub fn new(session: Session, config: &AppConfig, view: Arc<dyn ResultsView>) -> Self {
        let backend = Backend::from_config(session.client().clone(), config);
        Self {
            session,
            backend,
            view,
            frame: FrameBand::from_config(config),
            poll: PollConfig::every(config.poll_interval()).with_timeout(config.task_timeout()),
            filters: None,
        }
    }

    /// Restores saved issue filters once results render.
    #[must_use]
    pub fn with_filters(mut self, filters: FilterStore) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Runs a check. Errors are rendered before being returned.
    pub async fn run(&self) -> AppResult<()> {
        self.view.set_html(&loading_panel());

        let result = self.execute().await;
        if let (Ok(()), Some(filters)) = (&result, &self.filters) {
            filters.restore(self.view.as_ref());
        }
        if let Err(e) = &result {
            error!("Health check failed: {e}");
            match e {
                AppError::Timeout(_) => self.view.set_html(&timeout_panel()),
                // Already rendered from the backend's own error page.
                AppError::Backend(_) => {}
                other => self
                    .view
                    .set_html(&error_panel(ERROR_TITLE, &other.user_message())),
            }
        }

        self.frame
            .resize_to_fit(self.session.client().as_ref(), self.view.as_ref())
            .await;
        result
    }

    async fn execute(&self) -> AppResult<()> {
        let request = check_request(self.session.data());
        info!("Starting health check for {}", request.url);

        match self.backend.start_check(&request).await? {
            CheckStart::Html(html) => {
                self.view.set_html(&html);
                Ok(())
            }
            CheckStart::Task(task_id) => self.await_task(&task_id).await,
            CheckStart::Failed(message) => {
                self.view.set_html(&error_panel(ERROR_TITLE, &message));
                Err(AppError::Backend(message))
            }
        }
    }

    async fn await_task(&self, task_id: &str) -> AppResult<()> {
        info!("Health check queued as task {task_id}");
        let backend = &self.backend;

        let stop = PollTask::new(self.poll)
            .run(|attempt| async move {
                match backend.task_status(task_id).await {
                    Ok(status) => match status.status {
                        TaskState::Pending => Tick::Pending,
                        TaskState::Complete => {
                            Tick::Done(Ok(status.results_html.unwrap_or_default()))
                        }
                        TaskState::Error => Tick::Done(Err(status)),
                    },
                    Err(e) => {
                        warn!("Task status poll {attempt} failed: {e}");
                        Tick::Pending
                    }
                }
            })
            .await;

        match stop {
            PollStop::Done(Ok(html)) => {
                self.view.set_html(&html);
                Ok(())
            }
            PollStop::Done(Err(status)) => {
                let message = status
                    .error
                    .unwrap_or_else(|| "The health check failed.".to_string());
                match status.results_html {
                    Some(html) if !html.trim().is_empty() => self.view.set_html(&html),
                    _ => self.view.set_html(&error_panel(ERROR_TITLE, &message)),
                }
                Err(AppError::Backend(message))
            }
            PollStop::TimedOut { elapsed } => Err(AppError::Timeout(elapsed)),
            PollStop::AttemptsExhausted { .. } | PollStop::Cancelled => {
                Err(AppError::Timeout(self.poll.timeout.unwrap_or_default()))
            }
        }
    }
}
