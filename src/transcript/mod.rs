//! Transcript retrieval for YouTube videos.

mod models;
mod youtube;

pub use models::{Transcript, TranscriptLine};
pub use youtube::YoutubeTranscriptFetcher;

use crate::error::Result;
use crate::video::VideoId;
use async_trait::async_trait;

/// Trait for transcript sources.
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    /// Fetch the transcript and metadata for a video.
    async fn fetch_transcript(&self, video_id: &VideoId) -> Result<Transcript>;
}

/// Thumbnail image URL for a video. No network access.
pub fn thumbnail_url(video_id: &VideoId) -> String {
    format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", video_id)
}
