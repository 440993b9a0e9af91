//! Host SDK contract for the Health Check app.
//!
//! The app runs inside a Zendesk App Framework iframe and reaches the outside
//! world only through the host: context and metadata lookups, frame resizing,
//! and proxied HTTP requests into the app's backend. This crate models that
//! surface as traits so the session and feature code never touch a concrete
//! SDK.
//!
//! # Components
//!
//! - [`HostClient`]: one initialized SDK handle
//! - [`HostFactory`]: the SDK `init()` entry point, which may fail
//! - [`RequestOptions`] / [`HostResponse`]: the `request()` call shape
//! - [`ProxyClient`]: executes requests over HTTP with reqwest
//! - [`StaticHost`]: a fixture-backed host for local runs

mod client;
mod error;
mod fixture;
mod proxy;
mod request;

pub use client::{HostClient, HostFactory, InitOptions};
pub use error::{HostError, HostResult};
pub use fixture::{HostFixture, StaticHost, StaticHostFactory};
pub use proxy::ProxyClient;
pub use request::{FrameSize, HostResponse, Method, RequestOptions};
