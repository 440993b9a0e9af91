//! Shared fakes for app tests.

#![allow(dead_code)]

use async_trait::async_trait;
use healthcheck_app::controllers::{PaymentWindow, PaymentWindowOpener};
use healthcheck_app::filters::FilterStore;
use healthcheck_app::{AppConfig, AppResult};
use healthcheck_cache::MemoryStore;
use healthcheck_host::{
    FrameSize, HostClient, HostError, HostResponse, HostResult, RequestOptions,
};
use healthcheck_session::Session;
use healthcheck_types::{
    AccountContext, AppMetadata, HostContext, InstallationId, Plan, SessionData, UserId, UserInfo,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const BACKEND: &str = "https://backend.test";

/// A results fragment with three issue rows.
pub const ISSUES_HTML: &str = r#"<table><tbody id="issues-table-body">
<tr class="issue-row" data-severity="high" data-category="triggers"><td>Trigger loops</td></tr>
<tr class="issue-row" data-severity="low" data-category="macros"><td>Unused <b>macro</b></td></tr>
<tr class="issue-row" data-category="macros" data-severity="high"><td>Broken macro</td></tr>
</tbody></table>"#;

/// A filter store holding `severity`/`category` selections.
pub fn saved_filters(severity: &str, category: &str) -> FilterStore {
    let store = FilterStore::new(Arc::new(MemoryStore::new()));
    store.save_severity(severity).unwrap();
    store.save_category(category).unwrap();
    store
}

pub fn test_config() -> AppConfig {
    AppConfig {
        backend_base_url: Some(BACKEND.to_string()),
        ..AppConfig::default()
    }
}

pub fn acme_data() -> SessionData {
    SessionData {
        context: HostContext {
            account: AccountContext {
                subdomain: "acme".into(),
            },
            instance_guid: Some("instance-1".into()),
            ..Default::default()
        },
        metadata: AppMetadata {
            installation_id: Some(InstallationId::new(123)),
            app_guid: Some("app-guid".into()),
            plan: Some(Plan { name: "Pro".into() }),
            version: Some("2.1.0".into()),
            ..Default::default()
        },
        user_info: UserInfo {
            id: UserId::new(55),
            name: "Agent".into(),
            email: "agent@acme.test".into(),
            role: "admin".into(),
            locale: "en-US".into(),
        },
    }
}

struct Route {
    path: String,
    responses: VecDeque<(u16, String)>,
}

/// A host whose proxied requests are answered from per-path scripts.
///
/// Each path replays its queued responses in order and then keeps returning
/// the last one.
pub struct ScriptedHost {
    data: SessionData,
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<RequestOptions>>,
    resizes: Mutex<Vec<FrameSize>>,
}

impl ScriptedHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            data: acme_data(),
            routes: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            resizes: Mutex::new(Vec::new()),
        })
    }

    pub fn session(self: &Arc<Self>) -> Session {
        Session::new(self.clone(), self.data.clone())
    }

    /// Queues a response for URLs containing `path`.
    pub fn respond(&self, path: &str, status: u16, body: &str) {
        let mut routes = self.routes.lock().unwrap();
        match routes.iter_mut().find(|r| r.path == path) {
            Some(route) => route.responses.push_back((status, body.to_string())),
            None => routes.push(Route {
                path: path.to_string(),
                responses: VecDeque::from([(status, body.to_string())]),
            }),
        }
    }

    pub fn requests(&self) -> Vec<RequestOptions> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RequestOptions> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.contains(path))
            .collect()
    }

    pub fn resizes(&self) -> Vec<FrameSize> {
        self.resizes.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostClient for ScriptedHost {
    async fn context(&self) -> HostResult<HostContext> {
        Ok(self.data.context.clone())
    }

    async fn metadata(&self) -> HostResult<AppMetadata> {
        Ok(self.data.metadata.clone())
    }

    async fn get(&self, _path: &str) -> HostResult<serde_json::Value> {
        Ok(serde_json::json!({ "currentUser": self.data.user_info }))
    }

    async fn invoke_resize(&self, size: FrameSize) -> HostResult<()> {
        self.resizes.lock().unwrap().push(size);
        Ok(())
    }

    async fn request(&self, options: RequestOptions) -> HostResult<HostResponse> {
        let url = options.url.clone();
        self.requests.lock().unwrap().push(options);

        let mut routes = self.routes.lock().unwrap();
        let Some(route) = routes.iter_mut().find(|r| url.contains(&r.path)) else {
            return Err(HostError::Status {
                status: 404,
                body: String::new(),
            });
        };
        let (status, body) = if route.responses.len() > 1 {
            route.responses.pop_front().unwrap()
        } else {
            route.responses.front().cloned().unwrap()
        };
        if (200..300).contains(&status) {
            Ok(HostResponse::new(status, body))
        } else {
            Err(HostError::Status { status, body })
        }
    }
}

/// A checkout window the test closes by hand.
#[derive(Clone, Default)]
pub struct FakeWindow {
    closed: Arc<AtomicBool>,
}

impl FakeWindow {
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl PaymentWindow for FakeWindow {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Hands out one shared [`FakeWindow`] and records the URLs opened.
#[derive(Default)]
pub struct FakeOpener {
    pub window: FakeWindow,
    pub opened: Mutex<Vec<String>>,
}

impl PaymentWindowOpener for FakeOpener {
    fn open(&self, url: &str) -> AppResult<Box<dyn PaymentWindow>> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(Box::new(self.window.clone()))
    }
}
