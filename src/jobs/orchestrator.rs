//! Job orchestrator - drives one recognition through the job platform
//!
//! 1. Submit the input as a new run
//! 2. Poll the run status until it is terminal
//! 3. Resolve the run's key-value store and fetch the `OUTPUT` record
//!
//! The three steps run strictly in sequence. The poll loop is bounded by
//! [`PollPolicy`] and can be stopped early through a [`CancellationToken`].

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::{Config, ConfigError, PlatformConfig};
use crate::jobs::{
    client::PlatformClient,
    domain::{JobError, JobRun, StatusOutcome},
    traits::JobPlatformApi,
};
use crate::recognition::{NormalizedResult, RecognitionError, RecognitionInput};

/// Key of the record the recognition job writes its result to
pub const OUTPUT_KEY: &str = "OUTPUT";

/// How long and how often to poll for a run's status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between status checks
    pub interval: Duration,
    /// Stop after this many status checks
    pub max_attempts: Option<u32>,
    /// Stop once this much time has passed since the first check
    pub max_elapsed: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        let config = PlatformConfig::default();
        Self {
            interval: config.poll_interval(),
            max_attempts: config.max_poll_attempts,
            max_elapsed: config.max_wait(),
        }
    }
}

impl TryFrom<&PlatformConfig> for PollPolicy {
    type Error = ConfigError;

    /// A zero interval would poll the platform in a tight loop, so it is refused.
    fn try_from(config: &PlatformConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            interval: config.poll_interval(),
            max_attempts: config.max_poll_attempts,
            max_elapsed: config.max_wait(),
        })
    }
}

/// Runs recognition jobs on the platform and waits for their output
pub struct JobOrchestrator {
    platform: Arc<dyn JobPlatformApi>,
    policy: PollPolicy,
}

impl JobOrchestrator {
    pub fn new(platform: Arc<dyn JobPlatformApi>, policy: PollPolicy) -> Self {
        Self { platform, policy }
    }

    /// Create an orchestrator talking to Apify, using credentials from `config`
    pub fn from_config(config: &Config) -> crate::error::Result<Self> {
        let policy = PollPolicy::try_from(&config.platform)?;
        let token = config.credentials.require_apify()?;
        let client = PlatformClient::new(token, &config.platform)?;
        Ok(Self::new(Arc::new(client), policy))
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Submit `input` as a new run.
    ///
    /// The input shape is checked first; an invalid input never reaches the
    /// platform.
    pub async fn submit_job(&self, input: &RecognitionInput) -> Result<String, JobError> {
        input.validate().map_err(|e| match e {
            RecognitionError::InvalidInput(message) => JobError::InvalidInput(message),
            other => JobError::InvalidInput(other.to_string()),
        })?;

        let run_id = self.platform.create_run(input).await?;
        tracing::info!(run_id = %run_id, include_raw = input.include_raw, "Submitted recognition job");
        Ok(run_id)
    }

    /// Poll until the run reaches a terminal status.
    ///
    /// Returns the final run on success. Failure statuses, the poll bounds and
    /// cancellation all end the wait with an error.
    pub async fn await_completion(
        &self,
        run_id: &str,
        cancel: &CancellationToken,
    ) -> Result<JobRun, JobError> {
        let started = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(JobError::Cancelled {
                    run_id: run_id.to_string(),
                });
            }

            attempts += 1;
            let run = self.platform.get_run(run_id).await?;
            tracing::debug!(run_id, attempt = attempts, status = %run.status, "Polled run status");

            match run.status.outcome() {
                StatusOutcome::Succeeded => {
                    tracing::info!(run_id, attempts, "Run succeeded");
                    return Ok(run);
                }
                StatusOutcome::Failed => {
                    tracing::warn!(run_id, status = %run.status, "Run failed");
                    return Err(JobError::JobFailed {
                        run_id: run_id.to_string(),
                        status: run.status,
                    });
                }
                StatusOutcome::Pending => {}
            }

            let elapsed = started.elapsed();
            let attempts_exhausted = self.policy.max_attempts.is_some_and(|max| attempts >= max);
            let time_exhausted = self
                .policy
                .max_elapsed
                .is_some_and(|max| elapsed + self.policy.interval > max);

            if attempts_exhausted || time_exhausted {
                tracing::warn!(run_id, attempts, ?elapsed, "Giving up on run");
                return Err(JobError::PollTimeout {
                    run_id: run_id.to_string(),
                    attempts,
                    elapsed,
                });
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(JobError::Cancelled { run_id: run_id.to_string() });
                }
                _ = tokio::time::sleep(self.policy.interval) => {}
            }
        }
    }

    /// Fetch the normalized result a finished run stored.
    pub async fn fetch_output(&self, run_id: &str) -> Result<NormalizedResult, JobError> {
        let run = self
            .platform
            .get_run(run_id)
            .await
            .map_err(|e| JobError::OutputRetrieval(e.to_string()))?;

        let store_id = run.default_key_value_store_id.ok_or_else(|| {
            JobError::OutputRetrieval(format!("run {} has no default key-value store", run_id))
        })?;

        let record = self
            .platform
            .get_record(&store_id, OUTPUT_KEY)
            .await
            .map_err(|e| match e {
                JobError::OutputRetrieval(_) => e,
                other => JobError::OutputRetrieval(other.to_string()),
            })?;

        serde_json::from_value(record).map_err(|e| {
            JobError::OutputRetrieval(format!("{} record is not a normalized result: {}", OUTPUT_KEY, e))
        })
    }

    /// Submit, wait, fetch.
    pub async fn run(
        &self,
        input: &RecognitionInput,
        cancel: &CancellationToken,
    ) -> Result<NormalizedResult, JobError> {
        let run_id = self.submit_job(input).await?;
        self.await_completion(&run_id, cancel).await?;
        self.fetch_output(&run_id).await
    }
}
