//! Issue table filters.

use crate::view::ResultsView;
use healthcheck_cache::{CacheResult, KeyValueStore};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

pub const SEVERITY_FILTER_KEY: &str = "severity_filter";
pub const CATEGORY_FILTER_KEY: &str = "category_filter";

/// Filter value matching every row.
pub const ALL: &str = "all";

/// A row of the issues table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRow {
    pub severity: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

static ISSUE_ROW: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"(?s)<tr\b([^>]*\bclass="[^"]*\bissue-row\b[^"]*"[^>]*)>(.*?)</tr>"#).ok()
});

static DATA_ATTR: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"\bdata-(severity|category)="([^"]*)""#).ok());

static TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]*>").ok());

/// Extracts the `tr.issue-row` rows of a rendered report.
///
/// Severity and category come from the row's `data-severity` and
/// `data-category` attributes; the description is the row's text.
#[must_use]
pub fn issue_rows(html: &str) -> Vec<IssueRow> {
    let (Some(row_pattern), Some(attr_pattern)) = (ISSUE_ROW.as_ref(), DATA_ATTR.as_ref()) else {
        return Vec::new();
    };
    row_pattern
        .captures_iter(html)
        .map(|row| {
            let mut issue = IssueRow {
                severity: String::new(),
                category: String::new(),
                description: row_text(&row[2]),
            };
            for attr in attr_pattern.captures_iter(&row[1]) {
                match &attr[1] {
                    "severity" => issue.severity = attr[2].to_string(),
                    _ => issue.category = attr[2].to_string(),
                }
            }
            issue
        })
        .collect()
}

fn row_text(cells: &str) -> String {
    let text = match TAG.as_ref() {
        Some(tag) => tag.replace_all(cells, " ").into_owned(),
        None => cells.to_string(),
    };
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Severity and category selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFilter {
    pub severity: String,
    pub category: String,
}

impl Default for IssueFilter {
    fn default() -> Self {
        Self {
            severity: ALL.to_string(),
            category: ALL.to_string(),
        }
    }
}

impl IssueFilter {
    #[must_use]
    pub fn matches(&self, row: &IssueRow) -> bool {
        (self.severity == ALL || self.severity == row.severity)
            && (self.category == ALL || self.category == row.category)
    }

    /// Rows visible under this filter, in order.
    pub fn apply<'a>(&self, rows: &'a [IssueRow]) -> Vec<&'a IssueRow> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

/// Persists filter selections across reloads. The entries never expire.
#[derive(Clone)]
pub struct FilterStore {
    store: Arc<dyn KeyValueStore>,
}

impl FilterStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The saved filter, with `all` for anything not saved.
    #[must_use]
    pub fn load(&self) -> IssueFilter {
        let mut filter = IssueFilter::default();
        if let Some(severity) = self.read(SEVERITY_FILTER_KEY) {
            filter.severity = severity;
        }
        if let Some(category) = self.read(CATEGORY_FILTER_KEY) {
            filter.category = category;
        }
        filter
    }

    /// Applies the saved filter to freshly rendered results.
    pub fn restore(&self, view: &dyn ResultsView) -> IssueFilter {
        let filter = self.load();
        debug!(
            "Restoring issue filter (severity: {}, category: {})",
            filter.severity, filter.category
        );
        view.apply_issue_filter(&filter);
        filter
    }

    pub fn save_severity(&self, severity: &str) -> CacheResult<()> {
        self.store.set_item(SEVERITY_FILTER_KEY, severity)
    }

    pub fn save_category(&self, category: &str) -> CacheResult<()> {
        self.store.set_item(CATEGORY_FILTER_KEY, category)
    }

    pub fn save(&self, filter: &IssueFilter) -> CacheResult<()> {
        self.save_severity(&filter.severity)?;
        self.save_category(&filter.category)
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get_item(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!("Failed to read {key}: {e}");
                None
            }
        }
    }
}
