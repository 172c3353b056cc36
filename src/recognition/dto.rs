//! AudD API Data Transfer Objects
//!
//! These types match what the AudD `recognize` endpoint returns when asked for
//! `return=spotify,apple_music`. They are the single validating parse step:
//! once a response deserializes into [`RecognizeResponse`], the adapter never
//! has to re-check for missing nested objects.
//!
//! A nested object that is `null` or `{}` deserializes to `None`. The provider
//! sends an empty object in some "no match" cases and we treat it exactly like
//! a missing key. Parsing is lenient below the top level: a field of the
//! wrong type (a numeric title, a nested object that is a string) is dropped
//! to `None` rather than failing the whole response.
//!
//! API Reference: https://docs.audd.io/
//!
//! Example response:
//! ```json
//! {
//!   "status": "success",
//!   "result": {
//!     "artist": "Imagine Dragons",
//!     "title": "Warriors",
//!     "album": "Warriors",
//!     "release_date": "2014-09-18",
//!     "label": "Universal Music",
//!     "timecode": "00:40",
//!     "song_link": "https://lis.tn/Warriors",
//!     "spotify": { "duration_ms": 170533, "popularity": 70, ... },
//!     "apple_music": { "url": "...", "previews": [{"url": "..."}], ... }
//!   }
//! }
//! ```

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level AudD response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RecognizeResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    /// Recognized song; `None` when nothing matched
    #[serde(default, deserialize_with = "non_empty_object")]
    pub result: Option<SongResult>,
    /// Free-form warning, passed through to the caller
    pub warning: Option<Value>,
    /// Error info if status == "error"
    #[serde(default, deserialize_with = "non_empty_object")]
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiError {
    #[serde(default, deserialize_with = "lenient")]
    pub error_code: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub error_message: Option<String>,
}

/// A recognized song
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SongResult {
    #[serde(default, deserialize_with = "lenient")]
    pub artist: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub album: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub timecode: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub song_link: Option<String>,
    #[serde(default, deserialize_with = "non_empty_object")]
    pub spotify: Option<SpotifyTrack>,
    #[serde(default, deserialize_with = "non_empty_object")]
    pub apple_music: Option<AppleMusicSong>,
}

/// Spotify track object (subset of the Web API track schema)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpotifyTrack {
    #[serde(default, deserialize_with = "millis")]
    pub duration_ms: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub popularity: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub explicit: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub preview_url: Option<String>,
    #[serde(default, deserialize_with = "non_empty_object")]
    pub external_ids: Option<SpotifyExternalIds>,
    #[serde(default, deserialize_with = "non_empty_object")]
    pub external_urls: Option<SpotifyExternalUrls>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpotifyExternalIds {
    #[serde(default, deserialize_with = "lenient")]
    pub isrc: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpotifyExternalUrls {
    #[serde(default, deserialize_with = "lenient")]
    pub spotify: Option<String>,
}

/// Apple Music song attributes
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppleMusicSong {
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub has_lyrics: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub genre_names: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub previews: Option<Vec<Preview>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Preview {
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

/// Keep a field only if it has the expected type; anything else is `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Deserialize an optional nested object. `null`, `{}` and non-objects are `None`.
fn non_empty_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) if !map.is_empty() => Ok(T::deserialize(Value::Object(map)).ok()),
        _ => Ok(None),
    }
}

/// Milliseconds as a whole number. Non-negative floats are truncated.
fn millis<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|ms| ms.is_finite() && *ms >= 0.0)
            .map(|ms| ms as u64)
    }))
}

/// Human name of a JSON value's type, for error messages
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_no_match_response() {
        let json = r#"{"status": "success", "result": null}"#;
        let response: RecognizeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status.as_deref(), Some("success"));
        assert!(response.result.is_none());
    }

    #[test]
    fn test_parse_full_response() {
        let json = r#"{
            "status": "success",
            "result": {
                "artist": "Imagine Dragons",
                "title": "Warriors",
                "album": "Warriors",
                "release_date": "2014-09-18",
                "label": "Universal Music",
                "timecode": "00:40",
                "song_link": "https://lis.tn/Warriors",
                "apple_music": {
                    "previews": [{"url": "https://audio.example/preview.m4a"}],
                    "artwork": {"width": 1500, "height": 1500},
                    "genreNames": ["Alternative", "Music"],
                    "hasLyrics": true,
                    "url": "https://music.apple.com/us/album/warriors/1440831203?i=1440831624"
                },
                "spotify": {
                    "album": {"name": "Warriors"},
                    "external_ids": {"isrc": "USUM71414163"},
                    "popularity": 66,
                    "explicit": false,
                    "preview_url": null,
                    "external_urls": {"spotify": "https://open.spotify.com/track/1lgN0A2Vki2FTON5PYq42m"},
                    "duration_ms": 170533
                }
            }
        }"#;

        let response: RecognizeResponse = serde_json::from_str(json).unwrap();
        let result = response.result.expect("result should be present");
        assert_eq!(result.title.as_deref(), Some("Warriors"));

        let spotify = result.spotify.expect("spotify should be present");
        assert_eq!(spotify.duration_ms, Some(170533));
        assert_eq!(spotify.external_ids.unwrap().isrc.as_deref(), Some("USUM71414163"));
        assert!(spotify.preview_url.is_none());

        let apple = result.apple_music.expect("apple_music should be present");
        assert_eq!(apple.has_lyrics, Some(true));
        assert_eq!(apple.genre_names.unwrap(), vec!["Alternative", "Music"]);
        assert_eq!(apple.previews.unwrap().len(), 1);
    }

    #[test]
    fn test_empty_nested_objects_are_absent() {
        let json = r#"{"status": "success", "result": {"title": "X", "spotify": {}, "apple_music": null}}"#;
        let response: RecognizeResponse = serde_json::from_str(json).unwrap();
        let result = response.result.unwrap();
        assert!(result.spotify.is_none());
        assert!(result.apple_music.is_none());
    }

    #[test]
    fn test_empty_result_is_absent() {
        let response: RecognizeResponse =
            serde_json::from_str(r#"{"status": "success", "result": {}}"#).unwrap();
        assert!(response.result.is_none());
    }

    #[test]
    fn test_parse_error_response() {
        let json = r#"{
            "status": "error",
            "error": {"error_code": 901, "error_message": "Recognition failed: authorization failed"},
            "request_params": {},
            "request_api_method": "recognize"
        }"#;
        let response: RecognizeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status.as_deref(), Some("error"));
        assert_eq!(response.error.unwrap().error_code, Some(901));
    }

    #[test]
    fn test_result_with_wrong_shape_is_absent() {
        let response: RecognizeResponse =
            serde_json::from_str(r#"{"status": "success", "result": "oops"}"#).unwrap();
        assert!(response.result.is_none());
    }

    #[test]
    fn test_wrong_typed_leaves_are_absent() {
        let json = r#"{
            "status": 200,
            "result": {
                "title": 1999,
                "artist": "Prince",
                "spotify": {"popularity": "high", "external_ids": "USWB19902945"},
                "apple_music": {"hasLyrics": "yes", "genreNames": "Pop", "previews": [1, 2]}
            }
        }"#;
        let response: RecognizeResponse = serde_json::from_str(json).unwrap();
        assert!(response.status.is_none());

        let result = response.result.unwrap();
        assert!(result.title.is_none());
        assert_eq!(result.artist.as_deref(), Some("Prince"));

        let spotify = result.spotify.unwrap();
        assert!(spotify.popularity.is_none());
        assert!(spotify.external_ids.is_none());

        let apple = result.apple_music.unwrap();
        assert!(apple.has_lyrics.is_none());
        assert!(apple.genre_names.is_none());
        assert!(apple.previews.is_none());
    }

    #[test]
    fn test_float_duration_is_truncated() {
        let response: RecognizeResponse = serde_json::from_str(
            r#"{"result": {"spotify": {"duration_ms": 185999.7}}}"#,
        )
        .unwrap();
        assert_eq!(response.result.unwrap().spotify.unwrap().duration_ms, Some(185999));

        let response: RecognizeResponse =
            serde_json::from_str(r#"{"result": {"spotify": {"duration_ms": -5}}}"#).unwrap();
        assert!(response.result.unwrap().spotify.unwrap().duration_ms.is_none());
    }
}
