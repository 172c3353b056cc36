//! Terminal rendering of a normalized result.
//!
//! "Nothing recognized" is a normal outcome and gets its own notice rather
//! than an error line.

use std::fmt;

use serde::Serialize;

use crate::recognition::NormalizedResult;

/// Shown when the provider could not match the audio
pub const NOT_RECOGNIZED: &str = "No song could be confidently identified.";

const MISSING: &str = "—";

/// Render `result` for the terminal. The raw provider payload is only
/// included when `show_raw` is set and the result carries one.
pub fn render_result(result: &NormalizedResult, show_raw: bool) -> String {
    Rendered { result, show_raw }.to_string()
}

struct Rendered<'a> {
    result: &'a NormalizedResult,
    show_raw: bool,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;

        if !result.is_recognized() {
            writeln!(f, "✗ {}", NOT_RECOGNIZED)?;
            return self.write_raw(f);
        }

        let track = &result.summary.track;
        let links = &result.summary.links;

        writeln!(f, "✓ Track Identified")?;
        writeln!(f)?;
        writeln!(f, "  {}", track.title.as_deref().unwrap_or("Unknown title"))?;
        writeln!(f, "  {}", track.artist.as_deref().unwrap_or("Unknown artist"))?;
        writeln!(f)?;
        writeln!(f, "  Album:        {}", or_missing(&track.album))?;
        writeln!(f, "  Release Date: {}", or_missing(&track.release_date))?;
        writeln!(f, "  ISRC:         {}", or_missing(&track.isrc))?;
        if let Some(label) = &track.label {
            writeln!(f, "  Label:        {}", label)?;
        }
        if let Some(seconds) = track.duration_seconds {
            writeln!(f, "  Duration:     {}:{:02}", seconds / 60, seconds % 60)?;
        }
        if let Some(timecode) = &result.summary.confidence.timecode {
            writeln!(f, "  Matched at:   {}", timecode)?;
        }

        let link_lines = [
            ("Spotify", &links.spotify),
            ("Apple Music", &links.apple_music),
            ("Song Page", &links.song_page),
        ];
        if link_lines.iter().any(|(_, url)| url.is_some()) {
            writeln!(f)?;
            for (name, url) in link_lines {
                if let Some(url) = url {
                    writeln!(f, "  {:<12} {}", name, url)?;
                }
            }
        }

        writeln!(f)?;
        writeln!(f, "Platform Details")?;
        write_json(f, &result.enrichment)?;

        if let Some(warnings) = result.warnings.as_ref().filter(|w| !w.is_null()) {
            writeln!(f)?;
            writeln!(f, "Warnings")?;
            write_json(f, warnings)?;
        }

        self.write_raw(f)
    }
}

impl Rendered<'_> {
    fn write_raw(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.show_raw {
            return Ok(());
        }
        if let Some(raw) = &self.result.raw {
            writeln!(f)?;
            writeln!(f, "Raw Provider Response")?;
            write_json(f, raw)?;
        }
        Ok(())
    }
}

fn or_missing(value: &Option<String>) -> &str {
    value.as_deref().filter(|s| !s.is_empty()).unwrap_or(MISSING)
}

fn write_json<T: Serialize>(f: &mut fmt::Formatter<'_>, value: &T) -> fmt::Result {
    let json = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
    for line in json.lines() {
        writeln!(f, "  {}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::normalize;
    use serde_json::json;

    fn recognized() -> NormalizedResult {
        normalize(&json!({
            "status": "success",
            "result": {
                "artist": "Imagine Dragons",
                "title": "Warriors",
                "album": "Warriors",
                "release_date": "2014-09-18",
                "timecode": "00:40",
                "song_link": "https://lis.tn/Warriors",
                "spotify": {
                    "duration_ms": 170573,
                    "popularity": 72,
                    "external_ids": {"isrc": "USUM71409916"},
                    "external_urls": {"spotify": "https://open.spotify.com/track/1lgN0A2Vki2FTON5PYq42m"}
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_not_recognized_notice() {
        let result = normalize(&json!({"status": "success", "result": null})).unwrap();
        let text = render_result(&result, false);
        assert!(text.contains(NOT_RECOGNIZED));
        assert!(!text.contains("Track Identified"));
    }

    #[test]
    fn test_recognized_track() {
        let text = render_result(&recognized(), false);
        assert!(text.contains("Track Identified"));
        assert!(text.contains("Warriors"));
        assert!(text.contains("Imagine Dragons"));
        assert!(text.contains("2014-09-18"));
        assert!(text.contains("USUM71409916"));
        assert!(text.contains("2:50"));
        assert!(text.contains("https://open.spotify.com/track/1lgN0A2Vki2FTON5PYq42m"));
        assert!(text.contains("\"popularity\": 72"));
        assert!(!text.contains("Warnings"));
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let result = normalize(&json!({"status": "success", "result": {"title": "X"}})).unwrap();
        let text = render_result(&result, false);
        assert!(text.contains("Unknown artist"));
        assert!(text.contains("Album:        —"));
        assert!(!text.contains("Spotify "));
    }

    #[test]
    fn test_warnings_are_shown() {
        let result = normalize(&json!({
            "status": "success",
            "result": {"title": "X"},
            "warning": {"error_code": 300, "error_message": "low confidence"}
        }))
        .unwrap();
        let text = render_result(&result, false);
        assert!(text.contains("Warnings"));
        assert!(text.contains("low confidence"));
    }

    #[test]
    fn test_raw_only_when_requested() {
        let mut result = recognized();
        result.raw = Some(json!({"marker": "raw-payload"}));

        assert!(!render_result(&result, false).contains("raw-payload"));
        assert!(render_result(&result, true).contains("raw-payload"));
    }
}
