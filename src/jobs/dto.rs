//! Apify API Data Transfer Objects
//!
//! Every Apify v2 response wraps its payload in a `data` envelope. Only the
//! fields we read are modelled; the rest are ignored.
//!
//! API Reference: https://docs.apify.com/api/v2
//!
//! Example run object:
//! ```json
//! {
//!   "data": {
//!     "id": "HG7ML7M8z78YcAPEB",
//!     "actId": "HDSasDasz78YcAPEB",
//!     "status": "RUNNING",
//!     "defaultKeyValueStoreId": "eJNzqsbPiopwJcgGQ"
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::domain::{JobRun, JobStatus};

/// `{ "data": ... }` envelope
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Run object
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub id: String,
    pub status: Option<JobStatus>,
    pub default_key_value_store_id: Option<String>,
}

impl From<Run> for JobRun {
    fn from(run: Run) -> Self {
        JobRun {
            id: run.id,
            // A freshly created run may omit status; it hasn't started yet
            status: run.status.unwrap_or(JobStatus::Ready),
            default_key_value_store_id: run.default_key_value_store_id,
        }
    }
}

// ============================================================================
// CONTRACT TESTS
// ============================================================================
