//! Data returned by the ZAF host SDK and the session snapshot built from it.

use crate::ids::{InstallationId, UserId};
use crate::params::UrlParam;
use serde::{Deserialize, Serialize};

/// Plan name used when the installation metadata carries no plan.
pub const DEFAULT_PLAN: &str = "Free";

/// Builds the Zendesk origin for an account subdomain.
#[must_use]
pub fn origin_for_subdomain(subdomain: &str) -> String {
    format!("https://{subdomain}.zendesk.com")
}

/// Extracts the account subdomain from a `https://{subdomain}.zendesk.com` origin.
///
/// Returns `None` for anything that is not a Zendesk origin.
#[must_use]
pub fn subdomain_from_origin(origin: &str) -> Option<String> {
    let host = origin
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    let subdomain = host.strip_suffix(".zendesk.com")?;
    if subdomain.is_empty() || subdomain.contains(['.', '/', ':']) {
        return None;
    }
    Some(subdomain.to_string())
}

/// Account section of the host context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountContext {
    pub subdomain: String,
}

/// Result of the host `context()` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostContext {
    pub account: AccountContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
}

impl HostContext {
    /// Returns the account subdomain, or `None` when the host left it blank.
    #[must_use]
    pub fn subdomain(&self) -> Option<&str> {
        let subdomain = self.account.subdomain.trim();
        (!subdomain.is_empty()).then_some(subdomain)
    }
}

/// Marketplace plan attached to the installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
}

/// Result of the host `metadata()` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_id: Option<InstallationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Installation settings as configured by the Zendesk admin.
    #[serde(default)]
    pub settings: serde_json::Map<String, serde_json::Value>,
}

impl AppMetadata {
    /// Returns the plan name, falling back to [`DEFAULT_PLAN`].
    #[must_use]
    pub fn plan_name(&self) -> &str {
        self.plan
            .as_ref()
            .map(|p| p.name.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_PLAN)
    }

    /// Returns a string-valued installation setting.
    #[must_use]
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(|v| v.as_str())
    }
}

/// The `currentUser` object returned by `get("currentUser")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub locale: String,
}

/// Everything fetched from the host for one page load.
///
/// This is the cacheable part of a session; the host handle itself is never
/// cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub context: HostContext,
    pub metadata: AppMetadata,
    pub user_info: UserInfo,
}

impl SessionData {
    #[must_use]
    pub fn installation_id(&self) -> Option<InstallationId> {
        self.metadata.installation_id
    }

    #[must_use]
    pub fn subdomain(&self) -> Option<&str> {
        self.context.subdomain()
    }

    /// Returns the Zendesk origin of the account, if the subdomain is known.
    #[must_use]
    pub fn origin(&self) -> Option<String> {
        self.subdomain().map(origin_for_subdomain)
    }

    /// Returns the value of a URL parameter as derived from this session.
    ///
    /// `plan` always has a value; the others are `None` when the host did not
    /// supply the underlying field.
    #[must_use]
    pub fn derived_param(&self, param: UrlParam) -> Option<String> {
        match param {
            UrlParam::InstallationId => self.installation_id().map(|id| id.to_string()),
            UrlParam::Plan => Some(self.metadata.plan_name().to_string()),
            UrlParam::Origin => self.origin(),
            UrlParam::AppGuid => self
                .metadata
                .app_guid
                .as_deref()
                .filter(|guid| !guid.is_empty())
                .map(str::to_string),
            UrlParam::UserId => Some(self.user_info.id.to_string()),
        }
    }
}
