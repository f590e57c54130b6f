//! YouTube video reference detection.
//!
//! Recognizes watch, short-link and embed URLs and extracts the video ID.
//! Matching is anchored to the whole (trimmed) input: a URL buried inside a
//! sentence is not a reference.

use crate::error::{Result, TldwError};
use serde::{Deserialize, Serialize};
use url::Url;

/// Canonical YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check whether the text is a YouTube video URL.
pub fn is_video_reference(text: &str) -> bool {
    extract_video_id(text).is_ok()
}

/// Extract the video ID from a YouTube video URL.
pub fn extract_video_id(text: &str) -> Result<VideoId> {
    let trimmed = text.trim();
    let not_a_reference = || TldwError::NotAReference(trimmed.to_string());

    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(not_a_reference());
    }

    // Scheme-less URLs ("youtu.be/...") are accepted.
    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else if trimmed.contains("://") {
        return Err(not_a_reference());
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|_| not_a_reference())?;
    let host = url.host_str().ok_or_else(not_a_reference)?;
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .unwrap_or(host);

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let id = match (host, segments.as_slice()) {
        ("youtu.be", [id]) => Some(id.to_string()),
        ("youtube.com", ["watch"]) => url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned()),
        ("youtube.com" | "youtube-nocookie.com", ["embed", id]) => Some(id.to_string()),
        _ => None,
    };

    match id {
        Some(id) if is_valid_id(&id) => Ok(VideoId(id)),
        _ => Err(not_a_reference()),
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
