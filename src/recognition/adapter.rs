//! Adapter layer: Convert AudD DTOs to the normalized result
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! If AudD changes their response format, only this file and dto.rs need to change.

use serde_json::Value;

use super::dto::{self, json_kind};
use crate::recognition::domain::{
    AppleMusicEnrichment, Confidence, Enrichment, Links, NormalizedResult, RecognitionError,
    SpotifyEnrichment, Summary, TrackSummary,
};

/// Parse a raw provider response into typed DTOs.
///
/// Only a top level that isn't an object is rejected. Missing, empty or
/// wrongly typed fields below it parse as absent.
pub fn parse_response(response: &Value) -> Result<dto::RecognizeResponse, RecognitionError> {
    if !response.is_object() {
        return Err(RecognitionError::MalformedResponse(format!(
            "expected a JSON object at the top level, got {}",
            json_kind(response)
        )));
    }

    serde_json::from_value(response.clone())
        .map_err(|e| RecognitionError::MalformedResponse(e.to_string()))
}

/// Normalize a raw provider response.
///
/// Pure: the same input always yields the same output. The `raw` field is
/// never set here; the caller decides whether to attach it.
pub fn normalize(response: &Value) -> Result<NormalizedResult, RecognitionError> {
    let parsed = parse_response(response)?;

    if let Some(ref error) = parsed.error {
        tracing::warn!(
            code = ?error.error_code,
            message = error.error_message.as_deref().unwrap_or(""),
            "Provider reported an error"
        );
    }

    Ok(to_normalized(parsed))
}

/// Map a parsed response onto the stable output schema
pub fn to_normalized(response: dto::RecognizeResponse) -> NormalizedResult {
    let recognized = response.result.is_some();
    let result = response.result.unwrap_or_default();

    let spotify = result.spotify.as_ref();
    let apple = result.apple_music.as_ref();

    let track = TrackSummary {
        title: result.title.clone(),
        artist: result.artist.clone(),
        album: result.album.clone(),
        release_date: result.release_date.clone(),
        label: result.label.clone(),
        duration_seconds: spotify.and_then(|s| s.duration_ms).map(|ms| ms / 1000),
        isrc: spotify
            .and_then(|s| s.external_ids.as_ref())
            .and_then(|ids| ids.isrc.clone()),
    };

    let links = Links {
        song_page: result.song_link.clone(),
        spotify: spotify
            .and_then(|s| s.external_urls.as_ref())
            .and_then(|urls| urls.spotify.clone()),
        apple_music: apple.and_then(|a| a.url.clone()),
    };

    let enrichment = Enrichment {
        spotify: spotify.map(spotify_enrichment),
        apple_music: apple.map(apple_music_enrichment),
    };

    NormalizedResult {
        summary: Summary {
            status: response.status,
            track,
            confidence: Confidence {
                recognized,
                timecode: result.timecode.clone(),
            },
            links,
        },
        enrichment,
        warnings: response.warning,
        raw: None,
    }
}

fn spotify_enrichment(track: &dto::SpotifyTrack) -> SpotifyEnrichment {
    SpotifyEnrichment {
        popularity: track.popularity,
        explicit: track.explicit,
        preview_url: track.preview_url.clone(),
    }
}

fn apple_music_enrichment(song: &dto::AppleMusicSong) -> AppleMusicEnrichment {
    AppleMusicEnrichment {
        has_lyrics: song.has_lyrics,
        genre: song.genre_names.clone(),
        preview_url: song
            .previews
            .as_ref()
            .and_then(|previews| previews.first())
            .and_then(|preview| preview.url.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_response() -> Value {
        json!({
            "status": "success",
            "result": {
                "artist": "Imagine Dragons",
                "title": "Warriors",
                "album": "Warriors",
                "release_date": "2014-09-18",
                "label": "Universal Music",
                "timecode": "00:40",
                "song_link": "https://lis.tn/Warriors",
                "spotify": {
                    "duration_ms": 185000,
                    "popularity": 66,
                    "explicit": false,
                    "preview_url": "https://p.scdn.co/mp3-preview/abc",
                    "external_ids": {"isrc": "USUM71414163"},
                    "external_urls": {"spotify": "https://open.spotify.com/track/xyz"}
                },
                "apple_music": {
                    "url": "https://music.apple.com/us/album/warriors",
                    "hasLyrics": true,
                    "genreNames": ["Alternative", "Music"],
                    "previews": [{"url": "a"}, {"url": "b"}]
                }
            },
            "warning": "Sample is too short"
        })
    }

    #[test]
    fn test_full_response_maps_every_field() {
        let result = normalize(&full_response()).unwrap();

        assert_eq!(result.summary.status.as_deref(), Some("success"));
        assert_eq!(result.summary.track.title.as_deref(), Some("Warriors"));
        assert_eq!(result.summary.track.artist.as_deref(), Some("Imagine Dragons"));
        assert_eq!(result.summary.track.label.as_deref(), Some("Universal Music"));
        assert_eq!(result.summary.track.duration_seconds, Some(185));
        assert_eq!(result.summary.track.isrc.as_deref(), Some("USUM71414163"));
        assert!(result.summary.confidence.recognized);
        assert_eq!(result.summary.confidence.timecode.as_deref(), Some("00:40"));
        assert_eq!(result.summary.links.song_page.as_deref(), Some("https://lis.tn/Warriors"));
        assert_eq!(
            result.summary.links.spotify.as_deref(),
            Some("https://open.spotify.com/track/xyz")
        );
        assert_eq!(
            result.summary.links.apple_music.as_deref(),
            Some("https://music.apple.com/us/album/warriors")
        );

        let spotify = result.enrichment.spotify.unwrap();
        assert_eq!(spotify.popularity, Some(66));
        assert_eq!(spotify.explicit, Some(false));

        let apple = result.enrichment.apple_music.unwrap();
        assert_eq!(apple.has_lyrics, Some(true));
        assert_eq!(apple.genre, Some(vec!["Alternative".to_string(), "Music".to_string()]));
        assert_eq!(apple.preview_url.as_deref(), Some("a"));

        assert_eq!(result.warnings, Some(json!("Sample is too short")));
        assert!(result.raw.is_none());
    }

    #[test]
    fn test_duration_is_floored_to_seconds() {
        let response = json!({"status": "success", "result": {"spotify": {"duration_ms": 185999}}});
        let result = normalize(&response).unwrap();
        assert_eq!(result.summary.track.duration_seconds, Some(185));
    }

    #[test]
    fn test_missing_duration_is_null_not_zero() {
        let response = json!({"status": "success", "result": {"spotify": {"popularity": 10}}});
        let result = normalize(&response).unwrap();
        assert_eq!(result.summary.track.duration_seconds, None);

        let json = serde_json::to_value(&result).unwrap();
        assert!(json["summary"]["track"]["duration_seconds"].is_null());
    }

    #[test]
    fn test_no_result_key() {
        let result = normalize(&json!({"status": "success"})).unwrap();
        assert!(!result.summary.confidence.recognized);
        assert!(result.enrichment.spotify.is_none());
        assert!(result.enrichment.apple_music.is_none());
        assert!(result.summary.track.title.is_none());
    }

    #[test]
    fn test_empty_result_is_not_recognized() {
        let result = normalize(&json!({"status": "success", "result": {}})).unwrap();
        assert!(!result.summary.confidence.recognized);
    }

    #[test]
    fn test_title_only_is_recognized() {
        let result = normalize(&json!({"status": "success", "result": {"title": "X"}})).unwrap();
        assert!(result.summary.confidence.recognized);
        assert_eq!(result.summary.track.title.as_deref(), Some("X"));
    }

    #[test]
    fn test_only_one_platform() {
        let response = json!({
            "status": "success",
            "result": {"title": "X", "apple_music": {"url": "https://music.apple.com/x"}}
        });
        let result = normalize(&response).unwrap();
        assert!(result.enrichment.spotify.is_none());
        assert!(result.enrichment.apple_music.is_some());
        assert!(result.summary.links.spotify.is_none());
        assert!(result.summary.track.isrc.is_none());
    }

    #[test]
    fn test_empty_platform_object_is_absent() {
        let response = json!({"status": "success", "result": {"title": "X", "spotify": {}}});
        let result = normalize(&response).unwrap();
        assert!(result.enrichment.spotify.is_none());
    }

    #[test]
    fn test_empty_previews_gives_null_preview() {
        let response = json!({
            "status": "success",
            "result": {"apple_music": {"url": "u", "previews": []}}
        });
        let result = normalize(&response).unwrap();
        assert_eq!(result.enrichment.apple_music.unwrap().preview_url, None);
    }

    #[test]
    fn test_first_preview_wins() {
        let result = normalize(&full_response()).unwrap();
        assert_eq!(
            result.enrichment.apple_music.unwrap().preview_url.as_deref(),
            Some("a")
        );
    }

    #[test]
    fn test_top_level_array_is_malformed() {
        let err = normalize(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, RecognitionError::MalformedResponse(_)));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_numeric_title_is_dropped_not_fatal() {
        let response = json!({"status": "success", "result": {"title": 1999, "artist": "Prince"}});
        let result = normalize(&response).unwrap();
        assert!(result.is_recognized());
        assert!(result.summary.track.title.is_none());
        assert_eq!(result.summary.track.artist.as_deref(), Some("Prince"));
    }

    #[test]
    fn test_float_duration_is_floored() {
        let response = json!({"status": "success", "result": {"spotify": {"duration_ms": 185000.0}}});
        let result = normalize(&response).unwrap();
        assert_eq!(result.summary.track.duration_seconds, Some(185));
    }

    #[test]
    fn test_non_object_result_is_not_recognized() {
        let result = normalize(&json!({"status": "success", "result": "oops"})).unwrap();
        assert!(!result.is_recognized());
    }

    #[test]
    fn test_provider_error_is_not_a_failure() {
        let response = json!({
            "status": "error",
            "error": {"error_code": 901, "error_message": "authorization failed"}
        });
        let result = normalize(&response).unwrap();
        assert_eq!(result.summary.status.as_deref(), Some("error"));
        assert!(!result.is_recognized());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let response = full_response();
        let first = serde_json::to_vec(&normalize(&response).unwrap()).unwrap();
        let second = serde_json::to_vec(&normalize(&response).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_output_shape_without_raw() {
        let json = serde_json::to_value(normalize(&full_response()).unwrap()).unwrap();
        let object = json.as_object().unwrap();
        assert!(object.contains_key("summary"));
        assert!(object.contains_key("enrichment"));
        assert!(object.contains_key("warnings"));
        assert!(!object.contains_key("raw"));
    }
}
