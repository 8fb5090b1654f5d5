//! HTTP transport used by the client.
//!
//! [`Transport`] is the seam between the client and the network: tests and
//! embedders can supply their own implementation.

use crate::error::{CloudSearchError, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::fmt;
use std::time::Duration;

/// Blocking request/response exchange with the service.
///
/// Implementations return the response body whatever the HTTP status, so
/// service error payloads reach the decoder. Only failures to obtain a
/// body at all are errors.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<String>;

    fn post(&self, url: &str, body: &str) -> Result<String>;
}

/// [`Transport`] backed by a blocking `reqwest` client.
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cloudsearch-rs/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, timeout })
    }

    fn read_body(url: &str, response: reqwest::blocking::Response) -> Result<String> {
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            tracing::debug!(%url, %status, "service answered with an error status");
        }
        if body.trim().is_empty() {
            return Err(CloudSearchError::EmptyResponse(format!(
                "{} (status {}): unknown error",
                url, status
            )));
        }
        Ok(body)
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send()?;
        Self::read_body(url, response)
    }

    fn post(&self, url: &str, body: &str) -> Result<String> {
        tracing::debug!(%url, bytes = body.len(), "POST");
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()?;
        Self::read_body(url, response)
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("timeout", &self.timeout)
            .finish()
    }
}
