//! Trait abstraction for the submission transport to enable mocking in tests

use super::response::SubmitResult;
use anyhow::Result;
use async_trait::async_trait;

/// Sends serialized form data to the backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmitTransport: Send + Sync {
    /// Send `json` as the `json` field of a multipart body and parse the reply
    async fn submit(&self, method: &str, url: &str, json: String) -> Result<SubmitResult>;
}
