//! YouTube transcript fetcher.
//!
//! Reads the player response embedded in the public watch page, picks a
//! caption track and downloads its timedtext XML.

use super::{Transcript, TranscriptFetcher, TranscriptLine};
use crate::error::{Result, TldwError};
use crate::video::VideoId;
use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, COOKIE, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse";

/// A caption track advertised by the player response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    #[serde(default)]
    language_code: String,
    /// "asr" for auto-generated captions.
    #[serde(default)]
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_manual(&self) -> bool {
        self.kind.as_deref() != Some("asr")
    }

    fn matches_language(&self, language: &str) -> bool {
        self.language_code == language
            || self
                .language_code
                .strip_prefix(language)
                .is_some_and(|rest| rest.starts_with('-'))
    }
}

/// Video metadata read from the player response.
#[derive(Debug, Clone, PartialEq)]
struct VideoDetails {
    title: String,
    author: String,
    channel_url: String,
}

/// Transcript fetcher that scrapes YouTube's watch page and caption tracks.
pub struct YoutubeTranscriptFetcher {
    client: reqwest::Client,
    base_url: String,
    language: String,
}

impl YoutubeTranscriptFetcher {
    /// Create a fetcher preferring captions in the given language.
    pub fn new(client: reqwest::Client, language: &str) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL, language)
    }

    /// Create a fetcher against a custom YouTube origin.
    pub fn with_base_url(client: reqwest::Client, base_url: &str, language: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            language: language.to_string(),
        }
    }

    /// GET a URL as text, mapping transport failures and non-2xx statuses.
    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(COOKIE, "CONSENT=YES+1")
            .send()
            .await
            .map_err(|e| TldwError::Network(format!("Failed to reach YouTube: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TldwError::Network(format!("YouTube returned HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| TldwError::Network(format!("Failed to read YouTube response: {}", e)))
    }

    fn absolute_url(&self, url: &str) -> String {
        if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            url.to_string()
        }
    }
}

#[async_trait]
impl TranscriptFetcher for YoutubeTranscriptFetcher {
    #[instrument(skip(self), fields(video_id = %video_id))]
    async fn fetch_transcript(&self, video_id: &VideoId) -> Result<Transcript> {
        let watch_url = format!("{}/watch?v={}", self.base_url, video_id);
        debug!("Fetching watch page");
        let page = self.get_text(&watch_url).await?;

        let player = extract_player_response(&page).ok_or_else(|| {
            TldwError::InvalidReference(format!("{}: no player data on watch page", video_id))
        })?;
        let details = read_video_details(&player, video_id)?;

        let tracks = caption_tracks(&player);
        let track = choose_track(&tracks, &self.language)
            .ok_or_else(|| TldwError::TranscriptUnavailable(video_id.to_string()))?;

        debug!(language = %track.language_code, "Fetching caption track");
        let xml = self.get_text(&self.absolute_url(&track.base_url)).await?;
        let lines = parse_caption_xml(&xml);

        if lines.is_empty() {
            return Err(TldwError::TranscriptUnavailable(video_id.to_string()));
        }

        info!("Fetched transcript for '{}' ({} lines)", details.title, lines.len());

        Ok(Transcript {
            video_id: video_id.clone(),
            title: details.title,
            author: details.author,
            channel_url: details.channel_url,
            lines,
        })
    }
}

/// Parse timedtext XML into transcript lines, dropping empty captions.
fn parse_caption_xml(xml: &str) -> Vec<TranscriptLine> {
    let doc = match roxmltree::Document::parse(xml) {
        Ok(doc) => doc,
        Err(e) => {
            warn!("Malformed caption XML: {}", e);
            return Vec::new();
        }
    };

    doc.descendants()
        .filter(|n| n.has_tag_name("text"))
        .filter_map(|n| {
            let start = seconds_attribute(&n, "start");
            let duration = seconds_attribute(&n, "dur");
            let text = clean_caption_text(&node_text(&n));
            if text.is_empty() {
                None
            } else {
                Some(TranscriptLine::new(text, start).with_duration(duration))
            }
        })
        .collect()
}

fn seconds_attribute(node: &roxmltree::Node, name: &str) -> f64 {
    node.attribute(name)
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn node_text(node: &roxmltree::Node) -> String {
    node.descendants()
        .filter(|d| d.is_text())
        .filter_map(|d| d.text())
        .collect()
}

/// Caption text is frequently escaped twice ("&amp;#39;") and may carry
/// `<font>` markup once unescaped. Text that is not a valid fragment is kept as is.
fn clean_caption_text(text: &str) -> String {
    let inner = if text.contains(['&', '<']) {
        let wrapped = format!("<t>{}</t>", text);
        match roxmltree::Document::parse(&wrapped) {
            Ok(doc) => node_text(&doc.root_element()),
            Err(_) => text.to_string(),
        }
    } else {
        text.to_string()
    };
    inner.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Find the `ytInitialPlayerResponse = {...}` assignment and parse its object.
fn extract_player_response(page: &str) -> Option<Value> {
    page.match_indices(PLAYER_RESPONSE_MARKER).find_map(|(idx, marker)| {
        let rest = page[idx + marker.len()..].trim_start();
        // Skip `"]` from the `window["ytInitialPlayerResponse"]` spelling.
        let rest = rest.strip_prefix("\"]").unwrap_or(rest).trim_start();
        let rest = rest.strip_prefix('=')?.trim_start();
        if !rest.starts_with('{') {
            return None;
        }
        // The object is followed by more script, so read only the first value.
        serde_json::Deserializer::from_str(rest)
            .into_iter::<Value>()
            .next()?
            .ok()
    })
}

fn read_video_details(player: &Value, video_id: &VideoId) -> Result<VideoDetails> {
    let status = player["playabilityStatus"]["status"].as_str().unwrap_or("OK");
    let details = &player["videoDetails"];

    if status == "ERROR" || details.is_null() {
        let reason = player["playabilityStatus"]["reason"]
            .as_str()
            .unwrap_or(status);
        return Err(TldwError::InvalidReference(format!("{}: {}", video_id, reason)));
    }

    Ok(VideoDetails {
        title: details["title"].as_str().unwrap_or("Untitled").to_string(),
        author: details["author"].as_str().unwrap_or("Unknown").to_string(),
        channel_url: details["channelId"]
            .as_str()
            .map(|id| format!("https://www.youtube.com/channel/{}", id))
            .unwrap_or_default(),
    })
}

fn caption_tracks(player: &Value) -> Vec<CaptionTrack> {
    let tracks = &player["captions"]["playerCaptionsTracklistRenderer"]["captionTracks"];
    serde_json::from_value(tracks.clone()).unwrap_or_default()
}

/// Preferred language (manual, then auto-generated), then any manual track, then the first.
fn choose_track<'a>(tracks: &'a [CaptionTrack], language: &str) -> Option<&'a CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.matches_language(language) && t.is_manual())
        .or_else(|| tracks.iter().find(|t| t.matches_language(language)))
        .or_else(|| tracks.iter().find(|t| t.is_manual()))
        .or_else(|| tracks.first())
}
