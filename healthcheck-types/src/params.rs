//! The URL query parameters the app carries across page loads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A recognized URL query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlParam {
    InstallationId,
    Plan,
    Origin,
    AppGuid,
    UserId,
}

impl UrlParam {
    /// Every recognized parameter, in the order they are written to URLs.
    pub const ALL: [UrlParam; 5] = [
        UrlParam::InstallationId,
        UrlParam::Plan,
        UrlParam::Origin,
        UrlParam::AppGuid,
        UrlParam::UserId,
    ];

    /// Returns the query-string key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InstallationId => "installation_id",
            Self::Plan => "plan",
            Self::Origin => "origin",
            Self::AppGuid => "app_guid",
            Self::UserId => "user_id",
        }
    }
}

impl fmt::Display for UrlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrlParam {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| crate::Error::UnknownParam(s.to_string()))
    }
}

/// A set of recognized parameters with non-empty values.
///
/// Empty values are never stored: an empty query value means "absent".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrlParams(BTreeMap<UrlParam, String>);

impl UrlParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects recognized, non-empty parameters from query pairs.
    /// Unknown keys are ignored; for repeated keys the first value wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            let Ok(param) = key.as_ref().parse::<UrlParam>() else {
                continue;
            };
            if !params.contains(param) {
                params.set(param, value.as_ref());
            }
        }
        params
    }

    #[must_use]
    pub fn get(&self, param: UrlParam) -> Option<&str> {
        self.0.get(&param).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, param: UrlParam) -> bool {
        self.0.contains_key(&param)
    }

    /// Sets a value. Returns false (and stores nothing) if the value is blank.
    pub fn set(&mut self, param: UrlParam, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.trim().is_empty() {
            return false;
        }
        self.0.insert(param, value);
        true
    }

    pub fn remove(&mut self, param: UrlParam) -> Option<String> {
        self.0.remove(&param)
    }

    /// Overlays `other` on top of `self`; values in `other` win.
    pub fn merge(&mut self, other: &UrlParams) {
        for (param, value) in &other.0 {
            self.0.insert(*param, value.clone());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (UrlParam, &str)> {
        self.0.iter().map(|(p, v)| (*p, v.as_str()))
    }
}
