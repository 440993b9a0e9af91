//! Shared test helpers for host tests.

#![allow(dead_code)]

use healthcheck_host::HostFixture;
use healthcheck_types::{AccountContext, AppMetadata, HostContext, InstallationId, Plan, UserId, UserInfo};

/// A fixture for the `acme` account with secure settings filled in.
pub fn acme_fixture() -> HostFixture {
    let mut settings = serde_json::Map::new();
    settings.insert("admin_email".into(), "admin@acme.test".into());
    settings.insert("api_token".into(), "secret-token".into());

    HostFixture {
        context: HostContext {
            account: AccountContext {
                subdomain: "acme".into(),
            },
            instance_guid: Some("instance-1".into()),
            ..Default::default()
        },
        metadata: AppMetadata {
            installation_id: Some(InstallationId::new(123)),
            app_id: Some(1001),
            app_guid: Some("app-guid".into()),
            plan: Some(Plan { name: "Pro".into() }),
            version: Some("2.1.0".into()),
            settings,
            ..Default::default()
        },
        current_user: UserInfo {
            id: UserId::new(55),
            name: "Agent".into(),
            email: "agent@acme.test".into(),
            role: "admin".into(),
            locale: "en-US".into(),
        },
    }
}
