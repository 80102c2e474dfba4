//! Upstream forwarding.
//!
//! # Responsibilities
//! - POST a translated request to `base_url + endpoint`
//! - Return the upstream status and body as-is
//!
//! # Design Decisions
//! - One shared `reqwest::Client` (pooled, cloned per handler)
//! - Every call has a deadline; there are no retries

use std::time::Duration;

use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::http::response::UpstreamReply;
use crate::translator::OutboundRequest;

/// Failures reaching the upstream API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("Failed to encode upstream body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Upstream request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Client for the fixed upstream API.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    /// Build a client from configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(UpstreamError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full upstream URL for `endpoint`.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Send `outbound` upstream and collect the reply.
    pub async fn forward(&self, outbound: &OutboundRequest) -> Result<UpstreamReply, UpstreamError> {
        let url = self.url_for(outbound.endpoint);
        let body = outbound.body_bytes()?;

        let response = self
            .client
            .post(&url)
            .headers(outbound.headers.clone())
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        tracing::debug!(
            url = %url,
            status = %status,
            bytes = body.len(),
            "Upstream replied"
        );

        Ok(UpstreamReply { status, body })
    }
}
