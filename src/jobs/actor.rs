//! The recognition job as it runs on the platform.
//!
//! The platform starts the container with the run's key-value store id in the
//! environment and the submitted input stored under `INPUT`. The job reads
//! that input, recognizes the audio and stores the normalized result under
//! `OUTPUT`, which is what [`JobOrchestrator::fetch_output`] reads back.
//!
//! Any error fails the process, so the platform marks the run `FAILED` and
//! no `OUTPUT` record is written.
//!
//! [`JobOrchestrator::fetch_output`]: super::JobOrchestrator::fetch_output

use crate::error::Result;
use crate::jobs::{JobError, JobPlatformApi, orchestrator::OUTPUT_KEY};
use crate::recognition::{NormalizedResult, RecognitionInput, RecognitionService};

/// Record key the platform stores run input under, unless told otherwise
pub const DEFAULT_INPUT_KEY: &str = "INPUT";

/// Where this run keeps its records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStorage {
    /// The run's default key-value store
    pub store_id: String,
    /// Key of the input record
    pub input_key: String,
}

/// Read this run's input from the platform
pub async fn read_input(
    platform: &dyn JobPlatformApi,
    storage: &RunStorage,
) -> std::result::Result<RecognitionInput, JobError> {
    let record = platform
        .get_record(&storage.store_id, &storage.input_key)
        .await?;

    serde_json::from_value(record).map_err(|e| {
        JobError::InvalidInput(format!("{} record is not a job input: {}", storage.input_key, e))
    })
}

/// Run the job once: read input, recognize, store `OUTPUT`.
pub async fn run(
    platform: &dyn JobPlatformApi,
    service: &RecognitionService,
    storage: &RunStorage,
) -> Result<NormalizedResult> {
    let input = read_input(platform, storage).await?;
    tracing::info!(
        has_url = input.audio_url.is_some(),
        has_audio = input.audio_b64.is_some(),
        include_raw = input.include_raw,
        "Received job input"
    );

    let result = service.run(&input).await?;

    let output = serde_json::to_value(&result)?;
    platform
        .put_record(&storage.store_id, OUTPUT_KEY, &output)
        .await?;
    tracing::info!(store_id = %storage.store_id, "Stored job output");

    Ok(result)
}
