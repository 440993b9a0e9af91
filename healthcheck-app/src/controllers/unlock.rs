//! Paid report unlock.
//!
//! Opens a hosted checkout window, then polls the unlock status while
//! watching the window. The first terminal condition wins and cancels the
//! other timer.

use crate::backend::{Backend, PaymentIntentRequest};
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::filters::FilterStore;
use crate::frame::FrameBand;
use crate::poll::{PollConfig, PollStop, PollTask, Tick};
use crate::view::{banner, BannerKind, ResultsView};
use healthcheck_session::Session;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use url::Url;

const UNLOCK_TIMEOUT_MESSAGE: &str = "Payment confirmation timed out. If you completed checkout, \
     reload the report in a few minutes.";

/// A checkout popup.
pub trait PaymentWindow: Send + Sync {
    fn is_closed(&self) -> bool;
}

/// Opens checkout popups (`window.open` in the browser build).
pub trait PaymentWindowOpener: Send + Sync {
    fn open(&self, url: &str) -> AppResult<Box<dyn PaymentWindow>>;
}

/// How an unlock attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockOutcome {
    /// The report was unlocked and its full HTML rendered.
    Unlocked,
    /// The user closed the checkout window first.
    WindowClosed,
}

pub struct UnlockController {
    session: Session,
    backend: Backend,
    view: Arc<dyn ResultsView>,
    frame: FrameBand,
    opener: Arc<dyn PaymentWindowOpener>,
    poll: PollConfig,
    window_check: Duration,
    filters: Option<FilterStore>,
}

impl UnlockController {
    pub fn new(
        session: Session,
        config: &AppConfig,
        view: Arc<dyn ResultsView>,
        opener: Arc<dyn PaymentWindowOpener>,
    ) -> Self {
        let backend = Backend::from_config(session.client().clone(), config);
        Self {
            session,
            backend,
            view,
            frame: FrameBand::from_config(config),
            opener,
            poll: PollConfig::every(config.poll_interval())
                .with_max_attempts(config.unlock_max_attempts),
            window_check: config.window_check_interval(),
            filters: None,
        }
    }

    /// Restores saved issue filters after the unlocked report renders.
    #[must_use]
    pub fn with_filters(mut self, filters: FilterStore) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Starts checkout for `report_id` and waits for the outcome.
    ///
    /// `redirect_url` is where checkout returns to, normally the current page.
    pub async fn unlock(&self, report_id: u64, redirect_url: &Url) -> AppResult<UnlockOutcome> {
        let result = self.start(report_id, redirect_url).await;
        match &result {
            Ok(UnlockOutcome::Unlocked) => {
                self.frame
                    .resize_to_fit(self.session.client().as_ref(), self.view.as_ref())
                    .await;
            }
            Ok(outcome) => info!("Unlock of report {report_id} stopped: {outcome:?}"),
            Err(AppError::Timeout(waited)) => {
                warn!("Unlock of report {report_id} not confirmed after {waited:?}");
                self.view.append_html(&banner(BannerKind::Warning, UNLOCK_TIMEOUT_MESSAGE));
            }
            Err(e) => {
                error!("Unlock of report {report_id} failed: {e}");
                self.view.append_html(&banner(
                    BannerKind::Danger,
                    &format!("{}. Please try again.", e.user_message()),
                ));
            }
        }
        result
    }

    async fn start(&self, report_id: u64, redirect_url: &Url) -> AppResult<UnlockOutcome> {
        let data = self.session.data();
        let request = PaymentIntentRequest {
            report_id,
            installation_id: data.installation_id().map(|id| id.get()),
            user_id: data.user_info.id.get(),
            redirect_url: redirect_url.to_string(),
        };
        let checkout_url = self.backend.create_payment_intent(&request).await?;
        info!("Opening checkout for report {report_id}");
        let window = self.opener.open(&checkout_url)?;
        self.watch(report_id, window.as_ref()).await
    }

    /// Polls unlock status until unlocked or the window closes.
    ///
    /// Reaching the attempt cap is an [`AppError::Timeout`].
    pub async fn watch(
        &self,
        report_id: u64,
        window: &dyn PaymentWindow,
    ) -> AppResult<UnlockOutcome> {
        let backend = &self.backend;
        let started = Instant::now();
        let poll = PollTask::new(self.poll).run(|attempt| async move {
            match backend.unlock_status(report_id).await {
                Ok(status) if status.is_unlocked => Tick::Done(status.html.unwrap_or_default()),
                Ok(_) => Tick::Pending,
                Err(e) => {
                    warn!("Unlock status check {attempt} failed: {e}");
                    Tick::Pending
                }
            }
        });

        tokio::select! {
            stop = poll => match stop {
                PollStop::Done(html) => {
                    info!("Report {report_id} unlocked");
                    self.view.set_html(&html);
                    if let Some(filters) = &self.filters {
                        filters.restore(self.view.as_ref());
                    }
                    Ok(UnlockOutcome::Unlocked)
                }
                PollStop::AttemptsExhausted { attempts } => {
                    debug!("Unlock status polled {attempts} times");
                    Err(AppError::Timeout(started.elapsed()))
                }
                PollStop::TimedOut { elapsed } => Err(AppError::Timeout(elapsed)),
                PollStop::Cancelled => Err(AppError::Timeout(started.elapsed())),
            },
            () = wait_for_close(window, self.window_check) => {
                info!("Checkout window closed; unlock polling stopped");
                Ok(UnlockOutcome::WindowClosed)
            }
        }
    }
}

async fn wait_for_close(window: &dyn PaymentWindow, every: Duration) {
    let every = every.max(Duration::from_millis(1));
    let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        if window.is_closed() {
            return;
        }
    }
}
