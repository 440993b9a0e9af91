mod common;

use common::{acme_data, ScriptedHost, BACKEND};
use healthcheck_app::backend::{CheckStart, TaskState};
use healthcheck_app::controllers::check_request;
use healthcheck_app::{AppError, Backend};
use healthcheck_host::{HostFixture, Method, ProxyClient, StaticHost};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Check response shapes ────────────────────────────────────────

#[test]
fn check_start_shapes() {
    assert_eq!(
        CheckStart::from_body(r#"{"task_id": "abc", "status": "pending"}"#),
        CheckStart::Task("abc".into())
    );
    assert_eq!(
        CheckStart::from_body(r#"{"results_html": "<table></table>"}"#),
        CheckStart::Html("<table></table>".into())
    );
    assert_eq!(
        CheckStart::from_body("<div>raw</div>"),
        CheckStart::Html("<div>raw</div>".into())
    );
    assert_eq!(
        CheckStart::from_body(r#"{"error": true, "message": "bad token"}"#),
        CheckStart::Failed("bad token".into())
    );
    assert_eq!(
        CheckStart::from_body(r#"{"task_id": 42}"#),
        CheckStart::Task("42".into())
    );
}

#[test]
fn check_request_uses_secure_placeholders() {
    let request = check_request(&acme_data());
    assert_eq!(request.url, "acme.zendesk.com");
    assert_eq!(request.email, "{{setting.admin_email}}");
    assert_eq!(request.api_token, "{{setting.api_token}}");
    assert_eq!(request.installation_id, Some(123));
    assert_eq!(request.plan, "Pro");
    assert_eq!(request.user_id, 55);
    assert_eq!(request.version.as_deref(), Some("2.1.0"));
    assert_eq!(request.instance_guid.as_deref(), Some("instance-1"));
}

// ── Through a scripted host ──────────────────────────────────────

#[tokio::test]
async fn endpoints_and_parsing() {
    let host = ScriptedHost::new();
    host.respond("/health_check/status/", 200, r#"{"status": "pending"}"#);
    host.respond("/report/", 200, r#"{"results_html": "<p>report</p>"}"#);
    host.respond("/check-unlock-status/", 200, r#"{"is_unlocked": false, "report_id": 9}"#);
    host.respond("/api/chat-widget/", 200, r#"{"is_enabled": true, "script": "go()"}"#);
    let backend = Backend::new(host.clone(), format!("{BACKEND}/"));

    assert_eq!(backend.task_status("t1").await.unwrap().status, TaskState::Pending);
    assert_eq!(backend.report(7).await.unwrap(), "<p>report</p>");
    assert!(!backend.unlock_status(9).await.unwrap().is_unlocked);
    assert!(backend.chat_widget().await.unwrap().is_enabled);

    let urls: Vec<String> = host.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            "https://backend.test/health_check/status/t1/",
            "https://backend.test/report/7/",
            "https://backend.test/check-unlock-status/?report_id=9",
            "https://backend.test/api/chat-widget/",
        ]
    );
    assert!(host.requests().iter().all(|r| r.method == Method::Get && r.secure));
}

#[tokio::test]
async fn failed_status_carries_backend_message() {
    let host = ScriptedHost::new();
    host.respond("/report/", 404, r#"{"error": "Report not found"}"#);
    let backend = Backend::new(host, BACKEND);

    let err = backend.report(1).await.unwrap_err();
    assert!(matches!(err, AppError::Network(_)));
    assert_eq!(err.user_message(), "Report not found");
}

#[tokio::test]
async fn unexpected_shape_is_an_error() {
    let host = ScriptedHost::new();
    host.respond("/report/", 200, "<html>login</html>");
    let backend = Backend::new(host, BACKEND);

    assert!(backend.report(1).await.is_err());
}

// ── Through the real proxy ───────────────────────────────────────

fn fixture() -> HostFixture {
    let data = acme_data();
    let mut metadata = data.metadata;
    metadata
        .settings
        .insert("admin_email".into(), "admin@acme.test".into());
    metadata
        .settings
        .insert("api_token".into(), "secret-token".into());
    HostFixture {
        context: data.context,
        metadata,
        current_user: data.user_info,
    }
}

#[tokio::test]
async fn check_request_reaches_backend_with_settings_filled_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check/"))
        .and(body_partial_json(json!({
            "url": "acme.zendesk.com",
            "email": "admin@acme.test",
            "api_token": "secret-token",
            "installation_id": 123,
            "user_id": 55,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "abc"})))
        .expect(1)
        .mount(&server)
        .await;

    let host = Arc::new(StaticHost::new(fixture(), ProxyClient::new().unwrap()));
    let backend = Backend::new(host, server.uri());

    let start = backend.start_check(&check_request(&acme_data())).await.unwrap();
    assert_eq!(start, CheckStart::Task("abc".into()));
}

#[tokio::test]
async fn unlock_status_query_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/check-unlock-status/"))
        .and(query_param("report_id", "9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"is_unlocked": true, "html": "<div>ok</div>"})),
        )
        .mount(&server)
        .await;

    let host = Arc::new(StaticHost::new(fixture(), ProxyClient::new().unwrap()));
    let backend = Backend::new(host, server.uri());

    let status = backend.unlock_status(9).await.unwrap();
    assert!(status.is_unlocked);
    assert_eq!(status.html.as_deref(), Some("<div>ok</div>"));
}
