use healthcheck_types::{UrlParam, UrlParams};
use pretty_assertions::assert_eq;

#[test]
fn param_keys_match_query_names() {
    let keys: Vec<&str> = UrlParam::ALL.iter().map(UrlParam::as_str).collect();
    assert_eq!(
        keys,
        vec!["installation_id", "plan", "origin", "app_guid", "user_id"]
    );
}

#[test]
fn param_from_str() {
    assert_eq!("app_guid".parse::<UrlParam>().unwrap(), UrlParam::AppGuid);
    assert!("utm_source".parse::<UrlParam>().is_err());
}

#[test]
fn set_rejects_blank_values() {
    let mut params = UrlParams::new();
    assert!(!params.set(UrlParam::Plan, ""));
    assert!(!params.set(UrlParam::Plan, "   "));
    assert!(params.is_empty());
    assert!(params.set(UrlParam::Plan, "Pro"));
    assert_eq!(params.get(UrlParam::Plan), Some("Pro"));
}

#[test]
fn from_pairs_ignores_unknown_and_empty() {
    let params = UrlParams::from_pairs([
        ("installation_id", "123"),
        ("foo", "bar"),
        ("plan", ""),
        ("origin", "https://acme.zendesk.com"),
    ]);
    assert_eq!(params.len(), 2);
    assert_eq!(params.get(UrlParam::InstallationId), Some("123"));
    assert!(!params.contains(UrlParam::Plan));
}

#[test]
fn from_pairs_keeps_first_value() {
    let params = UrlParams::from_pairs([("plan", "Pro"), ("plan", "Free")]);
    assert_eq!(params.get(UrlParam::Plan), Some("Pro"));
}

#[test]
fn merge_prefers_other() {
    let mut base = UrlParams::from_pairs([("plan", "Free"), ("user_id", "1")]);
    let overlay = UrlParams::from_pairs([("plan", "Pro")]);
    base.merge(&overlay);
    assert_eq!(base.get(UrlParam::Plan), Some("Pro"));
    assert_eq!(base.get(UrlParam::UserId), Some("1"));
}

#[test]
fn serializes_as_flat_object() {
    let params = UrlParams::from_pairs([("installation_id", "123"), ("plan", "Pro")]);
    let json = serde_json::to_value(&params).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"installation_id": "123", "plan": "Pro"})
    );
    let back: UrlParams = serde_json::from_value(json).unwrap();
    assert_eq!(back, params);
}
