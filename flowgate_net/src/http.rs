//! Blocking HTTP feed retrieval.

use flowgate_traits::FeedTransport;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("http client build failed: {0}")]
    Build(String),
    #[error("GET {url} failed: {reason}")]
    Request { url: String, reason: String },
}

/// One HTTP GET per fetch against the configured timeout. Non-2xx statuses
/// are errors; there is no retry.
pub struct HttpFeed {
    client: reqwest::blocking::Client,
}

impl HttpFeed {
    pub fn new(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self { client })
    }
}

impl FeedTransport for HttpFeed {
    fn fetch(
        &mut self,
        locator: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let request_err = |e: reqwest::Error| HttpError::Request {
            url: locator.to_string(),
            reason: e.to_string(),
        };
        tracing::debug!(url = locator, "fetching feed");
        let body = self
            .client
            .get(locator)
            .send()
            .map_err(request_err)?
            .error_for_status()
            .map_err(request_err)?
            .text()
            .map_err(request_err)?;
        tracing::debug!(url = locator, bytes = body.len(), "feed fetched");
        Ok(body)
    }
}
