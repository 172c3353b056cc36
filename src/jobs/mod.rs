//! Recognition jobs on the Apify platform.
//!
//! The recognition itself runs remotely as an actor. This module submits
//! inputs, waits for the run to finish and reads back the stored result.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - run status, run, errors
//! - **API DTOs** (`dto.rs`) - Apify response envelopes
//! - **Client** (`client.rs`) - HTTP client for the runs and key-value store endpoints
//! - **Traits** (`traits.rs`) - seam for mocking the platform
//! - **Orchestrator** (`orchestrator.rs`) - submit, poll, fetch
//! - **Actor** (`actor.rs`) - the job itself, run on the platform: read
//!   `INPUT`, recognize, store `OUTPUT`
//!
//! # Usage
//!
//! ```ignore
//! let orchestrator = JobOrchestrator::from_config(&config)?;
//! let cancel = CancellationToken::new();
//! let result = orchestrator.run(&input, &cancel).await?;
//! ```

pub mod actor;
pub mod client;
pub mod domain;
pub mod dto;
pub mod orchestrator;
pub mod traits;

pub use client::PlatformClient;
pub use domain::{JobError, JobRun, JobStatus};
pub use orchestrator::{JobOrchestrator, PollPolicy};
pub use traits::JobPlatformApi;
