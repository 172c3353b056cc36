//! Domain models for runs on the job platform.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Status of a run, as reported by the platform.
///
/// Unknown values are kept verbatim and treated as still in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Ready,
    Running,
    Succeeded,
    Failed,
    TimingOut,
    TimedOut,
    Aborting,
    Aborted,
    Other(String),
}

/// What the poll loop should do with a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    Pending,
    Succeeded,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Ready => "READY",
            JobStatus::Running => "RUNNING",
            JobStatus::Succeeded => "SUCCEEDED",
            JobStatus::Failed => "FAILED",
            JobStatus::TimingOut => "TIMING-OUT",
            JobStatus::TimedOut => "TIMED-OUT",
            JobStatus::Aborting => "ABORTING",
            JobStatus::Aborted => "ABORTED",
            JobStatus::Other(s) => s,
        }
    }

    pub fn outcome(&self) -> StatusOutcome {
        match self {
            JobStatus::Succeeded => StatusOutcome::Succeeded,
            JobStatus::Failed | JobStatus::Aborted | JobStatus::TimedOut => StatusOutcome::Failed,
            _ => StatusOutcome::Pending,
        }
    }

    /// No further transitions happen after a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.outcome() != StatusOutcome::Pending
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "READY" => JobStatus::Ready,
            "RUNNING" => JobStatus::Running,
            "SUCCEEDED" => JobStatus::Succeeded,
            "FAILED" => JobStatus::Failed,
            "TIMING-OUT" => JobStatus::TimingOut,
            "TIMED-OUT" => JobStatus::TimedOut,
            "ABORTING" => JobStatus::Aborting,
            "ABORTED" => JobStatus::Aborted,
            _ => JobStatus::Other(value),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One execution of the recognition job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRun {
    pub id: String,
    pub status: JobStatus,
    /// Key-value store holding the run's `OUTPUT` record
    pub default_key_value_store_id: Option<String>,
}

/// Errors that can occur while driving a job
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Job submission failed: {message}")]
    Submission {
        status: Option<u16>,
        message: String,
    },

    #[error("Status check for run {run_id} failed: {message}")]
    StatusCheck { run_id: String, message: String },

    #[error("Run {run_id} finished with status {status}")]
    JobFailed { run_id: String, status: JobStatus },

    #[error("Gave up waiting for run {run_id} after {attempts} polls ({elapsed:?})")]
    PollTimeout {
        run_id: String,
        attempts: u32,
        elapsed: Duration,
    },

    #[error("Waiting for run {run_id} was cancelled")]
    Cancelled { run_id: String },

    #[error("Failed to retrieve job output: {0}")]
    OutputRetrieval(String),

    #[error("Failed to store job output: {0}")]
    OutputStorage(String),
}

impl JobError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            JobError::InvalidInput(_) => "invalid_input",
            JobError::Submission { .. } => "submission",
            JobError::StatusCheck { .. } => "status_check",
            JobError::JobFailed { .. } => "job_failed",
            JobError::PollTimeout { .. } => "poll_timeout",
            JobError::Cancelled { .. } => "cancelled",
            JobError::OutputRetrieval(_) => "output_retrieval",
            JobError::OutputStorage(_) => "output_storage",
        }
    }
}
