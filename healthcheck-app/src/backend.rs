//! Typed access to the Health Check backend through the host request proxy.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use healthcheck_host::{HostClient, HostResponse, RequestOptions};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Backend paths.
pub mod paths {
    pub const CHECK: &str = "/check/";
    pub const TASK_STATUS: &str = "/health_check/status/";
    pub const REPORT: &str = "/report/";
    pub const UNLOCK_STATUS: &str = "/check-unlock-status/";
    pub const PAYMENT_INTENT: &str = "/create-payment-intent/";
    pub const MONITORING: &str = "/monitoring-settings/";
    pub const CHAT_WIDGET: &str = "/api/chat-widget/";
}

/// How the backend answered a check request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStart {
    /// Results are ready to render.
    Html(String),
    /// The check runs asynchronously; poll this task.
    Task(String),
    /// The backend refused to start the check.
    Failed(String),
}

impl CheckStart {
    /// Classifies a check response: `{task_id}`, `{results_html}`, an
    /// `{error, message}` object, or a raw HTML fragment.
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        let Ok(serde_json::Value::Object(object)) = serde_json::from_str(body) else {
            return Self::Html(body.to_string());
        };
        if let Some(task_id) = object.get("task_id").and_then(json_id) {
            return Self::Task(task_id);
        }
        if let Some(html) = object.get("results_html").and_then(|v| v.as_str()) {
            return Self::Html(html.to_string());
        }
        let message = object
            .get("message")
            .or_else(|| object.get("error"))
            .and_then(|v| v.as_str())
            .unwrap_or("The health check could not be started.");
        Self::Failed(message.to_string())
    }
}

fn json_id(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// State of an asynchronous health check task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Pending,
    Complete,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskStatus {
    pub status: TaskState,
    #[serde(default)]
    pub results_html: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnlockStatus {
    #[serde(default)]
    pub is_unlocked: bool,
    #[serde(default)]
    pub html: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatWidget {
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub script: String,
}

#[derive(Deserialize)]
struct ResultsHtml {
    results_html: String,
}

#[derive(Deserialize)]
struct CheckoutUrl {
    url: String,
}

/// Body of `POST /check/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRequest {
    pub url: String,
    pub email: String,
    pub api_token: String,
    pub instance_guid: Option<String>,
    pub app_guid: Option<String>,
    pub installation_id: Option<u64>,
    pub subdomain: String,
    pub plan: String,
    pub version: Option<String>,
    pub user_id: u64,
}

/// Body of `POST /create-payment-intent/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentIntentRequest {
    pub report_id: u64,
    pub installation_id: Option<u64>,
    pub user_id: u64,
    pub redirect_url: String,
}

/// Body of `POST /monitoring-settings/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitoringRequest {
    pub installation_id: String,
    pub user_id: u64,
    pub is_active: bool,
    pub frequency: String,
    pub notification_emails: Vec<String>,
    pub redirect_url: String,
}

/// Backend endpoints, called through the host's secure request proxy.
#[derive(Clone)]
pub struct Backend {
    client: Arc<dyn HostClient>,
    base_url: String,
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Backend {
    pub fn new(client: Arc<dyn HostClient>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn from_config(client: Arc<dyn HostClient>, config: &AppConfig) -> Self {
        Self::new(client, config.base_url())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn client(&self) -> &Arc<dyn HostClient> {
        &self.client
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn start_check(&self, body: &CheckRequest) -> AppResult<CheckStart> {
        let options = RequestOptions::post_json(self.url(paths::CHECK), body)?.secure();
        let response = self.send(options).await?;
        Ok(CheckStart::from_body(&response.body))
    }

    pub async fn task_status(&self, task_id: &str) -> AppResult<TaskStatus> {
        let url = format!("{}{task_id}/", self.url(paths::TASK_STATUS));
        self.get_json(url).await
    }

    /// Rendered HTML of a stored report.
    pub async fn report(&self, report_id: u64) -> AppResult<String> {
        let url = format!("{}{report_id}/", self.url(paths::REPORT));
        let report: ResultsHtml = self.get_json(url).await?;
        Ok(report.results_html)
    }

    pub async fn unlock_status(&self, report_id: u64) -> AppResult<UnlockStatus> {
        let url = format!("{}?report_id={report_id}", self.url(paths::UNLOCK_STATUS));
        self.get_json(url).await
    }

    /// Creates a hosted checkout session and returns its URL.
    pub async fn create_payment_intent(&self, body: &PaymentIntentRequest) -> AppResult<String> {
        let options = RequestOptions::post_json(self.url(paths::PAYMENT_INTENT), body)?.secure();
        let checkout: CheckoutUrl = self.send(options).await?.json()?;
        Ok(checkout.url)
    }

    pub async fn save_monitoring(&self, body: &MonitoringRequest) -> AppResult<()> {
        let options = RequestOptions::post_json(self.url(paths::MONITORING), body)?.secure();
        self.send(options).await?;
        Ok(())
    }

    pub async fn chat_widget(&self) -> AppResult<ChatWidget> {
        self.get_json(self.url(paths::CHAT_WIDGET)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> AppResult<T> {
        let response = self.send(RequestOptions::get(url).secure()).await?;
        Ok(response.json()?)
    }

    async fn send(&self, options: RequestOptions) -> AppResult<HostResponse> {
        debug!("{} {}", options.method.as_str(), options.url);
        self.client.request(options).await.map_err(AppError::from)
    }
}
