//! Music recognition - identifies a song from audio via the AudD API.
//!
//! # Architecture
//!
//! Same separation as every external integration in this crate:
//! - **Domain models** (`domain.rs`) - input, request and the normalized result
//! - **API DTOs** (`dto.rs`) - exact provider response shapes
//! - **Adapter** (`adapter.rs`) - the only DTO → domain conversion
//! - **Client** (`client.rs`) - HTTP client for the provider
//! - **Traits** (`traits.rs`) - seam for mocking the provider
//! - **Service** (`service.rs`) - validate, call, normalize
//!
//! # Usage
//!
//! ```ignore
//! let service = RecognitionService::from_config(&config)?;
//! let input = RecognitionInput::from_url("https://example.com/clip.mp3", false);
//! let result = service.run(&input).await?;
//! println!("recognized: {}", result.is_recognized());
//! ```

pub mod adapter;
pub mod client;
pub mod domain;
pub mod dto;
pub mod service;
pub mod traits;

pub use adapter::normalize;
pub use client::ProviderClient;
pub use domain::{
    NormalizedResult, Platform, RecognitionError, RecognitionInput, RecognitionRequest,
};
pub use service::RecognitionService;
pub use traits::RecognitionApi;
