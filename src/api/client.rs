//! HTTP client for submitting the form
//!
//! Posts the serialized form data as the single `json` field of a
//! `multipart/form-data` body and parses the status reply.

use super::response::SubmitResult;
use super::traits::SubmitTransport;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{multipart, Client, Method};
use std::time::Duration;
use tracing::debug;

/// Name of the multipart field carrying the JSON-encoded data
pub const JSON_FIELD: &str = "json";

/// Transport backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SubmitTransport for HttpTransport {
    async fn submit(&self, method: &str, url: &str, json: String) -> Result<SubmitResult> {
        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .with_context(|| format!("invalid submit method `{method}`"))?;

        let body = multipart::Form::new().text(JSON_FIELD, json);

        let response = self
            .client
            .request(method, url)
            .multipart(body)
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("failed to read response body")?;
        debug!(%status, body = %text, "Submission response");

        serde_json::from_str(&text)
            .with_context(|| format!("unexpected response from server ({status}): {text}"))
    }
}
