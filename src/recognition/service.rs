//! Recognition service - the body of the recognition job
//!
//! 1. Validate the input (exactly one audio source)
//! 2. Call the provider once
//! 3. Normalize the response
//! 4. Attach the raw response if the caller asked for it

use std::sync::Arc;

use crate::config::Config;
use crate::recognition::{
    adapter,
    client::ProviderClient,
    domain::{NormalizedResult, Platform, RecognitionError, RecognitionInput},
    traits::RecognitionApi,
};

/// Service that turns a [`RecognitionInput`] into a [`NormalizedResult`]
pub struct RecognitionService {
    provider: Arc<dyn RecognitionApi>,
    return_sources: Vec<Platform>,
}

impl RecognitionService {
    /// Create a service backed by the given provider
    pub fn new(provider: Arc<dyn RecognitionApi>, return_sources: Vec<Platform>) -> Self {
        Self {
            provider,
            return_sources,
        }
    }

    /// Create a service talking to AudD, using credentials from `config`
    pub fn from_config(config: &Config) -> crate::error::Result<Self> {
        let token = config.credentials.require_audd()?;
        let client = ProviderClient::new(token, &config.provider)?;
        Ok(Self::new(Arc::new(client), config.provider.return_sources.clone()))
    }

    /// Run one recognition end to end.
    ///
    /// Invalid input fails before any network activity.
    pub async fn run(&self, input: &RecognitionInput) -> Result<NormalizedResult, RecognitionError> {
        let request = input.to_request()?;

        let response = self.provider.recognize(&request, &self.return_sources).await?;
        let mut normalized = adapter::normalize(&response)?;

        tracing::info!(
            recognized = normalized.is_recognized(),
            title = normalized.summary.track.title.as_deref().unwrap_or(""),
            artist = normalized.summary.track.artist.as_deref().unwrap_or(""),
            "Recognition finished"
        );

        if input.include_raw {
            normalized.raw = Some(response);
        }

        Ok(normalized)
    }
}
