//! Data models for transcripts.

use crate::video::VideoId;
use serde::{Deserialize, Serialize};

/// A single caption line with its playback offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptLine {
    /// Caption text.
    pub text: String,
    /// Start offset in seconds.
    pub start_seconds: f64,
    /// Display duration in seconds (0 when the track does not say).
    pub duration_seconds: f64,
}

impl TranscriptLine {
    /// Create a new transcript line.
    pub fn new(text: impl Into<String>, start_seconds: f64) -> Self {
        Self {
            text: text.into(),
            start_seconds,
            duration_seconds: 0.0,
        }
    }

    /// Set the display duration.
    pub fn with_duration(mut self, duration_seconds: f64) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }
}

/// A video transcript together with the metadata needed to render a summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Video this transcript belongs to.
    pub video_id: VideoId,
    /// Video title.
    pub title: String,
    /// Channel name.
    pub author: String,
    /// Channel URL.
    pub channel_url: String,
    /// Caption lines in playback order.
    pub lines: Vec<TranscriptLine>,
}

impl Transcript {
    /// Full transcript text: every line, in order, joined by single spaces.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
