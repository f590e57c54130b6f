//! Anthropic Messages API provider.

use super::{read_json, transport_error, ProviderOptions, Summarizer};
use crate::error::{Result, TldwError};
use crate::video::VideoId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const VENDOR: &str = "Anthropic";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    fn text(&self) -> String {
        self.content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Anthropic-backed summarizer.
pub struct AnthropicSummarizer {
    client: reqwest::Client,
    options: ProviderOptions,
    endpoint: String,
}

impl AnthropicSummarizer {
    pub fn new(options: ProviderOptions, http: reqwest::Client) -> Self {
        let base = options
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');
        let endpoint = format!("{}/v1/messages", base);

        Self {
            client: http,
            options,
            endpoint,
        }
    }
}

#[async_trait]
impl Summarizer for AnthropicSummarizer {
    fn vendor(&self) -> &'static str {
        VENDOR
    }

    #[instrument(skip(self, prompt), fields(model = %self.options.model, prompt_len = prompt.len()))]
    async fn summarize_video(&self, video_id: &VideoId, prompt: &str) -> Result<String> {
        let request = MessagesRequest {
            model: &self.options.model,
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.options.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(VENDOR, e))?;

        let body: MessagesResponse = read_json(VENDOR, response).await?;
        let summary = body.text().trim().to_string();

        if summary.is_empty() {
            return Err(TldwError::provider(VENDOR, "Empty response from model"));
        }

        debug!("Generated summary for {} ({} chars)", video_id, summary.len());
        Ok(summary)
    }
}
