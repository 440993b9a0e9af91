//! Monitoring settings form.

use crate::backend::{Backend, MonitoringRequest};
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::view::{banner, BannerKind, ResultsView};
use healthcheck_session::Session;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};
use tracing::{error, info};
use url::Url;

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// True if `email` (trimmed) looks like an address.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email.trim()))
}

/// How often scheduled checks run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl Frequency {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(AppError::Validation(format!("Unknown frequency: {other}"))),
        }
    }
}

/// The submitted form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitoringForm {
    pub installation_id: String,
    pub is_active: bool,
    pub frequency: Frequency,
    pub notification_emails: Vec<String>,
}

impl MonitoringForm {
    /// An empty form for the session's installation.
    #[must_use]
    pub fn for_session(session: &Session) -> Self {
        Self {
            installation_id: session
                .installation_id()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Trimmed emails that pass validation; blanks and invalid entries are
    /// dropped.
    #[must_use]
    pub fn valid_emails(&self) -> Vec<String> {
        self.notification_emails
            .iter()
            .map(|email| email.trim())
            .filter(|email| !email.is_empty() && is_valid_email(email))
            .map(str::to_string)
            .collect()
    }
}

pub struct MonitoringController {
    session: Session,
    backend: Backend,
    view: Arc<dyn ResultsView>,
}

impl MonitoringController {
    pub fn new(session: Session, config: &AppConfig, view: Arc<dyn ResultsView>) -> Self {
        let backend = Backend::from_config(session.client().clone(), config);
        Self {
            session,
            backend,
            view,
        }
    }

    /// Validates the form and, if it passes, saves it.
    ///
    /// The outcome is rendered as a banner either way.
    pub async fn submit(&self, form: &MonitoringForm, redirect_url: &Url) -> AppResult<()> {
        let result = self.save(form, redirect_url).await;
        match &result {
            Ok(()) => {
                info!("Monitoring settings saved");
                self.view
                    .set_html(&banner(BannerKind::Success, "✅ Settings saved successfully!"));
            }
            Err(e) => {
                error!("Error saving monitoring settings: {e}");
                self.view.set_html(&banner(
                    BannerKind::Danger,
                    &format!("❌ {}. Please try again.", e.user_message()),
                ));
            }
        }
        result
    }

    async fn save(&self, form: &MonitoringForm, redirect_url: &Url) -> AppResult<()> {
        let emails = form.valid_emails();
        if form.is_active && emails.is_empty() {
            return Err(AppError::Validation(
                "Please add at least one valid email address when monitoring is active"
                    .to_string(),
            ));
        }

        let request = MonitoringRequest {
            installation_id: form.installation_id.clone(),
            user_id: self.session.user_info().id.get(),
            is_active: form.is_active,
            frequency: form.frequency.to_string(),
            notification_emails: emails,
            redirect_url: redirect_url.to_string(),
        };
        self.backend.save_monitoring(&request).await
    }
}
