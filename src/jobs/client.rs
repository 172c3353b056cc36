//! Apify HTTP client
//!
//! Three endpoints are used:
//! - `POST /acts/{actorId}/runs?waitForFinish=<secs>` - start a run
//! - `GET /actor-runs/{runId}` - run status and storage ids
//! - `GET /key-value-stores/{storeId}/records/{key}` - a stored record
//! - `PUT /key-value-stores/{storeId}/records/{key}` - store a record (used
//!   by the job itself to publish its output)
//!
//! All requests carry the API token as a bearer header, never in the URL.

use reqwest::{RequestBuilder, Response};
use serde_json::Value;

use super::domain::{JobError, JobRun};
use super::dto;
use crate::config::PlatformConfig;
use crate::recognition::RecognitionInput;

/// Apify API client
pub struct PlatformClient {
    token: String,
    http_client: reqwest::Client,
    base_url: String,
    actor_id: String,
    wait_for_finish_secs: u64,
}

impl PlatformClient {
    /// Create a new client for the configured actor
    pub fn new(token: impl Into<String>, config: &PlatformConfig) -> Result<Self, JobError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .timeout(config.request_timeout())
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| JobError::Submission {
                status: None,
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            token: token.into(),
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            actor_id: config.actor_id.clone(),
            wait_for_finish_secs: config.wait_for_finish_secs,
        })
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.token)
    }

    fn runs_url(&self) -> String {
        format!(
            "{}/acts/{}/runs?waitForFinish={}",
            self.base_url,
            urlencoding::encode(&self.actor_id),
            self.wait_for_finish_secs
        )
    }

    fn run_url(&self, run_id: &str) -> String {
        format!("{}/actor-runs/{}", self.base_url, urlencoding::encode(run_id))
    }

    fn record_url(&self, store_id: &str, key: &str) -> String {
        format!(
            "{}/key-value-stores/{}/records/{}",
            self.base_url,
            urlencoding::encode(store_id),
            urlencoding::encode(key)
        )
    }

    /// Start a run with `input` as its JSON input; returns the run id
    pub async fn create_run(&self, input: &RecognitionInput) -> Result<String, JobError> {
        let response = self
            .authorized(self.http_client.post(self.runs_url()))
            .json(input)
            .send()
            .await
            .map_err(|e| JobError::Submission {
                status: None,
                message: e.to_string(),
            })?;

        let response = check_status(response).await.map_err(|(status, message)| {
            JobError::Submission {
                status: Some(status),
                message,
            }
        })?;

        let envelope: dto::Envelope<dto::Run> = response.json().await.map_err(|e| JobError::Submission {
            status: None,
            message: format!("unexpected run response: {}", e),
        })?;

        Ok(envelope.data.id)
    }

    /// Fetch the current state of a run
    pub async fn get_run(&self, run_id: &str) -> Result<JobRun, JobError> {
        let status_check = |message: String| JobError::StatusCheck {
            run_id: run_id.to_string(),
            message,
        };

        let response = self
            .authorized(self.http_client.get(self.run_url(run_id)))
            .send()
            .await
            .map_err(|e| status_check(e.to_string()))?;

        let response = check_status(response)
            .await
            .map_err(|(_, message)| status_check(message))?;

        let envelope: dto::Envelope<dto::Run> = response
            .json()
            .await
            .map_err(|e| status_check(format!("unexpected run response: {}", e)))?;

        Ok(envelope.data.into())
    }

    /// Fetch a record from a key-value store as JSON
    pub async fn get_record(&self, store_id: &str, key: &str) -> Result<Value, JobError> {
        let response = self
            .authorized(self.http_client.get(self.record_url(store_id, key)))
            .send()
            .await
            .map_err(|e| JobError::OutputRetrieval(e.to_string()))?;

        let response = check_status(response)
            .await
            .map_err(|(_, message)| JobError::OutputRetrieval(message))?;

        response
            .json::<Value>()
            .await
            .map_err(|e| JobError::OutputRetrieval(format!("record {} is not JSON: {}", key, e)))
    }

    /// Store `value` as a JSON record in a key-value store
    pub async fn put_record(&self, store_id: &str, key: &str, value: &Value) -> Result<(), JobError> {
        let response = self
            .authorized(self.http_client.put(self.record_url(store_id, key)))
            .json(value)
            .send()
            .await
            .map_err(|e| JobError::OutputStorage(e.to_string()))?;

        check_status(response)
            .await
            .map_err(|(_, message)| JobError::OutputStorage(message))?;
        Ok(())
    }
}

/// Pass successful responses through; turn anything else into (status, message)
async fn check_status(response: Response) -> Result<Response, (u16, String)> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err((
        status.as_u16(),
        format!(
            "HTTP {}: {} - {}",
            status,
            status.canonical_reason().unwrap_or("Unknown"),
            body.chars().take(200).collect::<String>()
        ),
    ))
}
