//! AudD HTTP client
//!
//! Handles communication with the AudD recognition endpoint.
//! See: https://docs.audd.io/
//!
//! ## Request shape
//!
//! - URL requests are sent as a plain urlencoded form (`api_token`, `return`,
//!   `url`). No audio bytes leave this process.
//! - Audio requests are sent as multipart with the decoded bytes in a `file`
//!   part. The provider sniffs the container format, so the file name is only
//!   a hint.
//!
//! The client makes exactly one HTTP call per `recognize` and never retries;
//! retry policy belongs to the caller.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::recognition::domain::{Platform, RecognitionError, RecognitionRequest};

/// AudD API client
pub struct ProviderClient {
    api_token: String,
    http_client: reqwest::Client,
    endpoint: String,
}

impl ProviderClient {
    /// Create a new client with the given API token and provider settings
    pub fn new(api_token: impl Into<String>, config: &ProviderConfig) -> Result<Self, RecognitionError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| RecognitionError::ProviderCall {
                status: None,
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            api_token: api_token.into(),
            http_client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Send one recognition request and return the provider's JSON untouched
    pub async fn recognize(
        &self,
        request: &RecognitionRequest,
        return_sources: &[Platform],
    ) -> Result<Value, RecognitionError> {
        let sources = join_sources(return_sources);

        let builder = match request {
            RecognitionRequest::Url(url) => {
                tracing::debug!(%url, sources = %sources, "Sending URL recognition request");
                self.http_client.post(&self.endpoint).form(&[
                    ("api_token", self.api_token.as_str()),
                    ("return", sources.as_str()),
                    ("url", url.as_str()),
                ])
            }
            RecognitionRequest::Audio(bytes) => {
                tracing::debug!(bytes = bytes.len(), sources = %sources, "Uploading audio for recognition");
                let part = Part::bytes(bytes.clone()).file_name("audio.mp3");
                let form = Form::new()
                    .text("api_token", self.api_token.clone())
                    .text("return", sources)
                    .part("file", part);
                self.http_client.post(&self.endpoint).multipart(form)
            }
        };

        let response = builder.send().await.map_err(|e| RecognitionError::ProviderCall {
            status: None,
            message: e.to_string(),
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RecognitionError::ProviderCall {
                status: Some(status.as_u16()),
                message: format!(
                    "HTTP {}: {} - {}",
                    status,
                    status.canonical_reason().unwrap_or("Unknown"),
                    body.chars().take(200).collect::<String>()
                ),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| RecognitionError::MalformedResponse(e.to_string()))
    }
}

/// Render requested platforms as the provider's comma-separated `return` field
pub fn join_sources(sources: &[Platform]) -> String {
    sources
        .iter()
        .map(Platform::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
