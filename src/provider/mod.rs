//! HTTP plumbing shared by the embedding and chat-completion clients.
//!
//! Speaks the OpenAI-compatible JSON protocol over a blocking `ureq` agent.
//! Failures are reported once and never retried.


use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

use crate::config::{ConfigError, ProviderConfig};
use crate::{PdfChatError, Result};

#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    api_key: String,
    agent: ureq::Agent,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: String,
}

impl fmt::Debug for ApiClient {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client from the provider configuration, resolving the API key
    #[inline]
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;
        Self::with_api_key(config, api_key)
    }

    #[inline]
    pub fn with_api_key(config: &ProviderConfig, api_key: String) -> Result<Self> {
        config.validate()?;
        let base_url = config.base_url()?;

        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_seconds)))
            .http_status_as_error(false)
            .build()
            .into();

        Ok(Self {
            base_url,
            api_key,
            agent,
        })
    }

    #[inline]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path such as `embeddings` against the base URL
    #[inline]
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|_| ConfigError::InvalidUrl(format!("{}{}", self.base_url, path)).into())
    }

    /// POST `body` as JSON to `path` and decode the JSON response
    #[inline]
    pub fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let request_json = serde_json::to_string(body).map_err(|e| {
            PdfChatError::Other(anyhow::Error::new(e).context("Failed to serialize request"))
        })?;

        debug!("POST {} ({} bytes)", url, request_json.len());
        let started = Instant::now();

        let mut response = self
            .agent
            .post(url.as_str())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .send(&request_json)
            .map_err(|e| PdfChatError::Network(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        let response_text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| PdfChatError::Network(format!("Failed to read response body: {}", e)))?;

        debug!(
            "POST {} returned {} in {:?}",
            url,
            status.as_u16(),
            started.elapsed()
        );

        if !status.is_success() {
            let message = error_message(&response_text);
            warn!("Provider error from {}: {} {}", url, status.as_u16(), message);
            return Err(PdfChatError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            PdfChatError::Other(
                anyhow::Error::new(e).context(format!("Failed to parse response from {}", url)),
            )
        })
    }
}

/// Pull the human-readable message out of an error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body).map_or_else(
        |_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty response body".to_string()
            } else {
                trimmed.to_string()
            }
        },
        |response| response.error.message,
    )
}
