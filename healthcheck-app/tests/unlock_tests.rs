mod common;

use common::{saved_filters, test_config, FakeOpener, ScriptedHost, ISSUES_HTML};
use healthcheck_app::controllers::{UnlockController, UnlockOutcome};
use healthcheck_app::{AppConfig, AppError, MemoryView, ResultsView};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const STATUS: &str = "/check-unlock-status/";
const INTENT: &str = "/create-payment-intent/";
const LOCKED: &str = r#"{"is_unlocked": false, "report_id": 9}"#;

fn page() -> Url {
    Url::parse("https://app.test/app/?installation_id=123&plan=Pro").unwrap()
}

struct Harness {
    host: Arc<ScriptedHost>,
    view: Arc<MemoryView>,
    opener: Arc<FakeOpener>,
    controller: UnlockController,
}

fn harness(config: AppConfig) -> Harness {
    let host = ScriptedHost::new();
    host.respond(INTENT, 200, r#"{"url": "https://checkout.test/c/1"}"#);
    let view = Arc::new(MemoryView::new());
    view.set_html("<div>locked report</div>");
    let opener = Arc::new(FakeOpener::default());
    let controller = UnlockController::new(host.session(), &config, view.clone(), opener.clone());
    Harness {
        host,
        view,
        opener,
        controller,
    }
}

#[tokio::test(start_paused = true)]
async fn stops_on_the_fifth_poll_when_unlocked() {
    let h = harness(test_config());
    for _ in 0..4 {
        h.host.respond(STATUS, 200, LOCKED);
    }
    h.host.respond(
        STATUS,
        200,
        r#"{"is_unlocked": true, "html": "<div>ok</div>"}"#,
    );

    let outcome = h.controller.unlock(9, &page()).await.unwrap();

    assert_eq!(outcome, UnlockOutcome::Unlocked);
    assert_eq!(h.view.html(), "<div>ok</div>");
    assert_eq!(h.host.requests_to(STATUS).len(), 5);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(h.host.requests_to(STATUS).len(), 5);
    assert_eq!(h.host.resizes().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn unlocked_report_restores_saved_filters() {
    let host = ScriptedHost::new();
    host.respond(INTENT, 200, r#"{"url": "https://checkout.test/c/1"}"#);
    let body = serde_json::json!({ "is_unlocked": true, "html": ISSUES_HTML });
    host.respond(STATUS, 200, &body.to_string());
    let view = Arc::new(MemoryView::new());
    let opener = Arc::new(FakeOpener::default());
    let controller = UnlockController::new(host.session(), &test_config(), view.clone(), opener)
        .with_filters(saved_filters("all", "macros"));

    let outcome = controller.unlock(9, &page()).await.unwrap();

    assert_eq!(outcome, UnlockOutcome::Unlocked);
    assert_eq!(view.visible_issues().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn payment_intent_carries_session_ids() {
    let h = harness(test_config());
    h.host
        .respond(STATUS, 200, r#"{"is_unlocked": true, "html": "<div>ok</div>"}"#);

    h.controller.unlock(9, &page()).await.unwrap();

    let intents = h.host.requests_to(INTENT);
    assert_eq!(intents.len(), 1);
    let body: serde_json::Value =
        serde_json::from_str(intents[0].data.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "report_id": 9,
            "installation_id": 123,
            "user_id": 55,
            "redirect_url": "https://app.test/app/?installation_id=123&plan=Pro",
        })
    );
    assert!(intents[0].secure);
    assert_eq!(
        *h.opener.opened.lock().unwrap(),
        vec!["https://checkout.test/c/1".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn closing_the_window_stops_polling() {
    let h = harness(test_config());
    h.host.respond(STATUS, 200, LOCKED);

    let window = h.opener.window.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        window.close();
    });

    let outcome = h.controller.unlock(9, &page()).await.unwrap();

    assert_eq!(outcome, UnlockOutcome::WindowClosed);
    assert_eq!(h.host.requests_to(STATUS).len(), 1);
    assert_eq!(h.view.html(), "<div>locked report</div>");

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(h.host.requests_to(STATUS).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn attempt_cap_is_reported_as_timeout() {
    let config = AppConfig {
        unlock_max_attempts: 3,
        ..test_config()
    };
    let h = harness(config);
    h.host.respond(STATUS, 200, LOCKED);

    let err = h.controller.unlock(9, &page()).await.unwrap_err();

    match err {
        AppError::Timeout(waited) => assert_eq!(waited, Duration::from_secs(6)),
        other => panic!("expected Timeout, got {other:?}"),
    }
    assert_eq!(h.host.requests_to(STATUS).len(), 3);

    let html = h.view.html();
    assert!(html.starts_with("<div>locked report</div>"));
    assert!(html.contains("alert-warning"));
    assert!(html.contains("Payment confirmation timed out"));

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(h.host.requests_to(STATUS).len(), 3);
}

#[tokio::test(start_paused = true)]
async fn closed_window_renders_nothing_even_near_the_cap() {
    let config = AppConfig {
        unlock_max_attempts: 3,
        ..test_config()
    };
    let h = harness(config);
    h.host.respond(STATUS, 200, LOCKED);
    let window = h.opener.window.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(4_500)).await;
        window.close();
    });

    let outcome = h.controller.unlock(9, &page()).await.unwrap();

    assert_eq!(outcome, UnlockOutcome::WindowClosed);
    assert_eq!(h.host.requests_to(STATUS).len(), 2);
    assert_eq!(h.view.html(), "<div>locked report</div>");
}

#[tokio::test(start_paused = true)]
async fn status_errors_do_not_stop_polling() {
    let h = harness(test_config());
    h.host.respond(STATUS, 500, "oops");
    h.host.respond(STATUS, 500, "oops");
    h.host
        .respond(STATUS, 200, r#"{"is_unlocked": true, "html": "<div>ok</div>"}"#);

    let outcome = h.controller.unlock(9, &page()).await.unwrap();

    assert_eq!(outcome, UnlockOutcome::Unlocked);
    assert_eq!(h.host.requests_to(STATUS).len(), 3);
}

#[tokio::test(start_paused = true)]
async fn payment_intent_failure_is_rendered() {
    let host = ScriptedHost::new();
    host.respond(INTENT, 400, r#"{"error": "Missing required parameters"}"#);
    let view = Arc::new(MemoryView::new());
    let opener = Arc::new(FakeOpener::default());
    let controller =
        UnlockController::new(host.session(), &test_config(), view.clone(), opener.clone());

    assert!(controller.unlock(9, &page()).await.is_err());

    assert!(view.html().contains("Missing required parameters"));
    assert!(opener.opened.lock().unwrap().is_empty());
    assert!(host.requests_to(STATUS).is_empty());
}
