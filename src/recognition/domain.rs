//! Internal domain models for music recognition.
//!
//! These types are OUR types - they don't change when the provider's API changes.
//! Provider responses get converted into [`NormalizedResult`] by the adapter.

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input accepted by the recognition job.
///
/// Exactly one of `audio_url` / `audio_b64` must be set. Empty strings count
/// as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_b64: Option<String>,
    #[serde(default)]
    pub include_raw: bool,
}

/// What actually gets sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionRequest {
    /// Reference to audio hosted elsewhere; no bytes cross the wire.
    Url(String),
    /// Decoded audio bytes, uploaded as a file part.
    Audio(Vec<u8>),
}

impl RecognitionInput {
    /// Input referencing hosted audio.
    pub fn from_url(url: impl Into<String>, include_raw: bool) -> Self {
        Self {
            audio_url: Some(url.into()),
            audio_b64: None,
            include_raw,
        }
    }

    /// Input embedding raw audio bytes (base64-encoded for transit).
    pub fn from_audio(bytes: &[u8], include_raw: bool) -> Self {
        Self {
            audio_url: None,
            audio_b64: Some(general_purpose::STANDARD.encode(bytes)),
            include_raw,
        }
    }

    /// Check the source shape without decoding the payload.
    pub fn validate(&self) -> Result<(), RecognitionError> {
        match (present(&self.audio_url), present(&self.audio_b64)) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            (None, None) => Err(RecognitionError::InvalidInput(
                "no audio input provided: set audio_url or audio_b64".to_string(),
            )),
            (Some(_), Some(_)) => Err(RecognitionError::InvalidInput(
                "audio_url and audio_b64 are mutually exclusive".to_string(),
            )),
        }
    }

    /// Validate the input and turn it into a provider request.
    pub fn to_request(&self) -> Result<RecognitionRequest, RecognitionError> {
        self.validate()?;

        if let Some(url) = present(&self.audio_url) {
            return Ok(RecognitionRequest::Url(url.to_string()));
        }

        let encoded = present(&self.audio_b64).unwrap_or_default();
        let bytes = general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| RecognitionError::InvalidInput(format!("audio_b64 is not valid base64: {}", e)))?;

        Ok(RecognitionRequest::Audio(bytes))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Stable output of a recognition run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResult {
    pub summary: Summary,
    pub enrichment: Enrichment,
    /// Provider warning, passed through untouched
    pub warnings: Option<Value>,
    /// Untouched provider response, only when explicitly requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl NormalizedResult {
    /// Whether the provider recognized anything at all.
    pub fn is_recognized(&self) -> bool {
        self.summary.confidence.recognized
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub status: Option<String>,
    pub track: TrackSummary,
    pub confidence: Confidence,
    pub links: Links,
}

/// Track identity fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub release_date: Option<String>,
    pub label: Option<String>,
    /// Whole seconds; `None` when the provider gave no duration
    pub duration_seconds: Option<u64>,
    pub isrc: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confidence {
    pub recognized: bool,
    /// Position in the sample where the match was found (e.g. "00:56")
    pub timecode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    pub song_page: Option<String>,
    pub spotify: Option<String>,
    pub apple_music: Option<String>,
}

/// Per-platform extras; each is `None` when that platform had no match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrichment {
    pub spotify: Option<SpotifyEnrichment>,
    pub apple_music: Option<AppleMusicEnrichment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotifyEnrichment {
    pub popularity: Option<u32>,
    pub explicit: Option<bool>,
    pub preview_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppleMusicEnrichment {
    pub has_lyrics: Option<bool>,
    pub genre: Option<Vec<String>>,
    pub preview_url: Option<String>,
}

/// Music streaming platforms the provider can attach metadata for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Spotify,
    AppleMusic,
}

impl Platform {
    /// Name used in the provider's `return` field
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Spotify => "spotify",
            Platform::AppleMusic => "apple_music",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during recognition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecognitionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Provider call failed: {message}")]
    ProviderCall {
        /// HTTP status, or `None` for transport failures
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

impl RecognitionError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            RecognitionError::InvalidInput(_) => "invalid_input",
            RecognitionError::ProviderCall { .. } => "provider_call",
            RecognitionError::MalformedResponse(_) => "malformed_response",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_input_becomes_url_request() {
        let input = RecognitionInput::from_url("https://example.com/a.mp3", false);
        assert_eq!(
            input.to_request().unwrap(),
            RecognitionRequest::Url("https://example.com/a.mp3".to_string())
        );
    }

    #[test]
    fn test_b64_input_is_decoded() {
        let input = RecognitionInput::from_audio(b"ID3 fake audio", false);
        assert_eq!(
            input.to_request().unwrap(),
            RecognitionRequest::Audio(b"ID3 fake audio".to_vec())
        );
    }

    #[test]
    fn test_no_source_is_invalid() {
        let input = RecognitionInput::default();
        assert!(matches!(
            input.to_request(),
            Err(RecognitionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_both_sources_is_invalid() {
        let input = RecognitionInput {
            audio_url: Some("https://example.com/a.mp3".to_string()),
            audio_b64: Some("AAAA".to_string()),
            include_raw: false,
        };
        let err = input.to_request().unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn test_empty_strings_count_as_absent() {
        let input = RecognitionInput {
            audio_url: Some(String::new()),
            audio_b64: Some("AAAA".to_string()),
            include_raw: false,
        };
        assert_eq!(
            input.to_request().unwrap(),
            RecognitionRequest::Audio(vec![0, 0, 0])
        );
    }

    #[test]
    fn test_bad_base64_is_invalid_input() {
        let input = RecognitionInput {
            audio_b64: Some("not base64!!".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            input.to_request(),
            Err(RecognitionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_input_parses_with_defaults() {
        let input: RecognitionInput =
            serde_json::from_str(r#"{"audio_url": "https://example.com/x.mp3"}"#).unwrap();
        assert!(!input.include_raw);
        assert!(input.audio_b64.is_none());
    }

    #[test]
    fn test_input_serializes_without_absent_source() {
        let input = RecognitionInput::from_url("https://example.com/x.mp3", true);
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("audio_b64").is_none());
        assert_eq!(json["include_raw"], true);
    }
}
