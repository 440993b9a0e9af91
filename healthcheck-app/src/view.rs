//! The results container and the panels rendered into it.

use crate::filters::{issue_rows, IssueFilter, IssueRow};
use std::sync::RwLock;

/// Where controllers render their output.
///
/// In the browser build this is the `#results` element.
pub trait ResultsView: Send + Sync {
    /// Replaces the container's content.
    fn set_html(&self, html: &str);

    /// Appends to the container's content.
    fn append_html(&self, html: &str);

    fn html(&self) -> String;

    /// Rendered heights of the container and its main content, in pixels.
    fn content_heights(&self) -> Vec<u32> {
        Vec::new()
    }

    /// Shows only the issue rows `filter` matches and selects it in the
    /// filter controls.
    fn apply_issue_filter(&self, _filter: &IssueFilter) {}
}

/// An in-memory container that also records every render.
#[derive(Debug, Default)]
pub struct MemoryView {
    inner: RwLock<ViewState>,
}

#[derive(Debug, Default)]
struct ViewState {
    html: String,
    renders: usize,
    heights: Vec<u32>,
    filter: Option<IssueFilter>,
}

impl MemoryView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set_html`/`append_html` calls so far.
    pub fn renders(&self) -> usize {
        self.inner.read().map(|s| s.renders).unwrap_or(0)
    }

    /// The filter last applied, if any.
    pub fn applied_filter(&self) -> Option<IssueFilter> {
        self.inner.read().ok().and_then(|s| s.filter.clone())
    }

    /// Issue rows in the current content that the applied filter shows.
    pub fn visible_issues(&self) -> Vec<IssueRow> {
        let Ok(state) = self.inner.read() else {
            return Vec::new();
        };
        let rows = issue_rows(&state.html);
        match &state.filter {
            Some(filter) => filter.apply(&rows).into_iter().cloned().collect(),
            None => rows,
        }
    }

    /// Sets the heights reported by [`ResultsView::content_heights`].
    pub fn set_content_heights(&self, heights: Vec<u32>) {
        if let Ok(mut state) = self.inner.write() {
            state.heights = heights;
        }
    }
}

impl ResultsView for MemoryView {
    fn set_html(&self, html: &str) {
        if let Ok(mut state) = self.inner.write() {
            state.html = html.to_string();
            state.renders += 1;
        }
    }

    fn append_html(&self, html: &str) {
        if let Ok(mut state) = self.inner.write() {
            state.html.push_str(html);
            state.renders += 1;
        }
    }

    fn html(&self) -> String {
        self.inner
            .read()
            .map(|s| s.html.clone())
            .unwrap_or_default()
    }

    fn content_heights(&self) -> Vec<u32> {
        self.inner
            .read()
            .map(|s| s.heights.clone())
            .unwrap_or_default()
    }

    fn apply_issue_filter(&self, filter: &IssueFilter) {
        if let Ok(mut state) = self.inner.write() {
            state.filter = Some(filter.clone());
        }
    }
}

/// Escapes text for inclusion in HTML.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Spinner shown while a request is in flight.
#[must_use]
pub fn loading_panel() -> String {
    concat!(
        r#"<div class="text-center my-5">"#,
        r#"<div class="spinner-border text-primary" role="status">"#,
        r#"<span class="d-none">Loading...</span>"#,
        "</div></div>",
    )
    .to_string()
}

/// Inline error panel.
#[must_use]
pub fn error_panel(title: &str, message: &str) -> String {
    format!(
        r#"<div class="alert alert-danger" role="alert"><h5>{}</h5><p>{}</p></div>"#,
        escape_html(title),
        escape_html(message)
    )
}

/// Shown when a status poll gives up.
#[must_use]
pub fn timeout_panel() -> String {
    error_panel(
        "Health Check Timed Out",
        "The health check is taking longer than expected. Please try again later.",
    )
}

/// Shown instead of the page when the session cannot be established.
#[must_use]
pub fn full_page_error(message: &str) -> String {
    format!(
        r#"<div class="container my-5"><div class="alert alert-danger" role="alert"><h4>Unable to load Health Check</h4><p>{}</p></div></div>"#,
        escape_html(message)
    )
}

/// Banner style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Warning,
    Danger,
}

impl BannerKind {
    const fn class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

/// A dismissible message banner.
#[must_use]
pub fn banner(kind: BannerKind, message: &str) -> String {
    format!(
        r#"<div class="alert alert-{} alert-dismissible fade show" role="alert">{}</div>"#,
        kind.class(),
        escape_html(message)
    )
}
