//! reqwest-backed execution of proxied requests.

use crate::error::{HostError, HostResult};
use crate::request::{HostResponse, Method, RequestOptions};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Default timeout for one proxied request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Executes [`RequestOptions`] directly over HTTP.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Client,
}

impl ProxyClient {
    /// Creates a proxy with the default timeout.
    pub fn new() -> HostResult<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client })
    }

    /// Wraps an existing reqwest client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Sends the request and returns the body of a 2xx response.
    pub async fn execute(&self, options: &RequestOptions) -> HostResult<HostResponse> {
        if options.url.trim().is_empty() {
            return Err(HostError::InvalidRequest("empty URL".to_string()));
        }

        debug!("{} {}", options.method.as_str(), options.url);

        let mut builder = match options.method {
            Method::Get => self.client.get(&options.url),
            Method::Post => self.client.post(&options.url),
        };
        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(content_type) = &options.content_type {
            builder = builder.header(CONTENT_TYPE, content_type.as_str());
        }
        if let Some(data) = &options.data {
            builder = builder.body(data.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let response = HostResponse::new(status, body);
        if !response.is_success() {
            return Err(HostError::Status {
                status,
                body: response.body,
            });
        }
        Ok(response)
    }
}
