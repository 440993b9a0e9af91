//! Shapes of the host `request()` and `invoke('resize')` calls.

use crate::error::HostResult;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// HTTP method of a proxied request (the ZAF `type` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

impl Method {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Options for a proxied request, matching the ZAF `request()` argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    pub url: String,
    #[serde(rename = "type")]
    pub method: Method,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Secure requests have `{{setting.NAME}}` placeholders filled in by the
    /// host, so secrets never reach the iframe.
    #[serde(default)]
    pub secure: bool,
}

impl RequestOptions {
    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            content_type: None,
            headers: BTreeMap::new(),
            data: None,
            secure: false,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    /// A POST with a JSON body.
    pub fn post_json<T: Serialize>(url: impl Into<String>, body: &T) -> HostResult<Self> {
        let mut options = Self::new(Method::Post, url);
        options.content_type = Some("application/json".to_string());
        options.data = Some(serde_json::to_string(body)?);
        Ok(options)
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    /// Replaces `{{setting.NAME}}` placeholders in the URL, headers and body.
    ///
    /// Placeholders naming unknown settings are left untouched.
    #[must_use]
    pub fn with_settings_substituted(
        mut self,
        settings: &serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        self.url = substitute(&self.url, settings);
        for value in self.headers.values_mut() {
            *value = substitute(value, settings);
        }
        if let Some(data) = self.data.take() {
            self.data = Some(substitute(&data, settings));
        }
        self
    }
}

static SETTING_PLACEHOLDER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\{\{setting\.([^}]+)\}\}").ok());

fn substitute(input: &str, settings: &serde_json::Map<String, serde_json::Value>) -> String {
    let Some(pattern) = SETTING_PLACEHOLDER.as_ref() else {
        return input.to_string();
    };
    pattern
        .replace_all(input, |caps: &Captures<'_>| match settings.get(&caps[1]) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// A completed proxied request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostResponse {
    pub status: u16,
    pub body: String,
}

impl HostResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> HostResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Argument of `invoke('resize', {width, height})`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: String,
    pub height: String,
}

impl FrameSize {
    /// Full-width frame of the given pixel height.
    #[must_use]
    pub fn full_width(height_px: u32) -> Self {
        Self {
            width: "100%".to_string(),
            height: format!("{height_px}px"),
        }
    }

    /// Returns the height in pixels, if it was given in pixels.
    #[must_use]
    pub fn height_px(&self) -> Option<u32> {
        self.height.strip_suffix("px")?.parse().ok()
    }
}
