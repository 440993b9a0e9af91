//! Page feature controllers.
//!
//! Each controller renders into a [`crate::ResultsView`] and catches its own
//! errors: a failure is rendered inline and also returned so the caller can
//! log or report it.

mod chat;
mod check;
mod monitoring;
mod report;
mod unlock;

pub use chat::ChatWidgetController;
pub use check::{check_request, CheckController};
pub use monitoring::{is_valid_email, Frequency, MonitoringController, MonitoringForm};
pub use report::ReportController;
pub use unlock::{PaymentWindow, PaymentWindowOpener, UnlockController, UnlockOutcome};
