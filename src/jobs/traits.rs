//! Trait seam over the job platform.
//!
//! Production code uses [`PlatformClient`](super::PlatformClient); tests use
//! [`mocks::MockPlatform`] to script status sequences and count calls.

use async_trait::async_trait;
use serde_json::Value;

use super::domain::{JobError, JobRun};
use crate::recognition::RecognitionInput;

/// Trait for an asynchronous job platform.
#[async_trait]
pub trait JobPlatformApi: Send + Sync {
    /// Start a run; returns its id.
    async fn create_run(&self, input: &RecognitionInput) -> Result<String, JobError>;

    /// Fetch the current state of a run.
    async fn get_run(&self, run_id: &str) -> Result<JobRun, JobError>;

    /// Fetch a record from a key-value store.
    async fn get_record(&self, store_id: &str, key: &str) -> Result<Value, JobError>;

    /// Store a record in a key-value store.
    async fn put_record(&self, store_id: &str, key: &str, value: &Value) -> Result<(), JobError>;
}

#[async_trait]
impl JobPlatformApi for super::client::PlatformClient {
    async fn create_run(&self, input: &RecognitionInput) -> Result<String, JobError> {
        self.create_run(input).await
    }

    async fn get_run(&self, run_id: &str) -> Result<JobRun, JobError> {
        self.get_run(run_id).await
    }

    async fn get_record(&self, store_id: &str, key: &str) -> Result<Value, JobError> {
        self.get_record(store_id, key).await
    }

    async fn put_record(&self, store_id: &str, key: &str, value: &Value) -> Result<(), JobError> {
        self.put_record(store_id, key, value).await
    }
}
