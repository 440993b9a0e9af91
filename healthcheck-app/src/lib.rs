//! Feature layer of the Health Check ZAF app.
//!
//! Everything here runs after [`page::bootstrap`] has produced a
//! [`healthcheck_session::Session`] and the page URL carries its parameters.
//! Controllers talk to the backend only through the session's host client
//! ([`Backend`]) and render into a [`ResultsView`].
//!
//! # Modules
//!
//! - [`config`]: backend environment and timing
//! - [`backend`]: typed backend endpoints
//! - [`poll`]: the cancellable polling task
//! - [`frame`]: iframe height band
//! - [`view`]: results container and panels
//! - [`controllers`]: run check, report, unlock, monitoring, chat widget
//! - [`filters`]: persisted issue filters
//! - [`page`]: page bootstrap

pub mod backend;
pub mod config;
pub mod controllers;
mod error;
pub mod filters;
pub mod frame;
pub mod page;
pub mod poll;
pub mod view;

pub use backend::Backend;
pub use config::{AppConfig, Environment};
pub use error::{AppError, AppResult};
pub use frame::FrameBand;
pub use page::{bootstrap, PageStart};
pub use poll::{PollCanceller, PollConfig, PollStop, PollTask, Tick};
pub use view::{MemoryView, ResultsView};
