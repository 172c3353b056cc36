//! Trait seam over the recognition provider.
//!
//! Production code uses [`ProviderClient`](super::ProviderClient); tests
//! substitute the mock below to count outbound calls and script responses.

use async_trait::async_trait;
use serde_json::Value;

use super::domain::{Platform, RecognitionError, RecognitionRequest};

/// Trait for a music recognition provider.
#[async_trait]
pub trait RecognitionApi: Send + Sync {
    /// Send one request and return the provider's raw JSON response.
    async fn recognize(
        &self,
        request: &RecognitionRequest,
        return_sources: &[Platform],
    ) -> Result<Value, RecognitionError>;
}

#[async_trait]
impl RecognitionApi for super::client::ProviderClient {
    async fn recognize(
        &self,
        request: &RecognitionRequest,
        return_sources: &[Platform],
    ) -> Result<Value, RecognitionError> {
        self.recognize(request, return_sources).await
    }
}
