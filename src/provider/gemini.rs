//! Google Gemini provider.

use super::{read_json, transport_error, ProviderOptions, Summarizer};
use crate::error::{Result, TldwError};
use crate::video::VideoId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const VENDOR: &str = "Gemini";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }

    fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}

/// Gemini-backed summarizer.
pub struct GeminiSummarizer {
    client: reqwest::Client,
    options: ProviderOptions,
    endpoint: String,
}

impl GeminiSummarizer {
    pub fn new(options: ProviderOptions, http: reqwest::Client) -> Self {
        let base = options
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');
        let endpoint = format!("{}/v1beta/models/{}:generateContent", base, options.model);

        Self {
            client: http,
            options,
            endpoint,
        }
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    fn vendor(&self) -> &'static str {
        VENDOR
    }

    #[instrument(skip(self, prompt), fields(model = %self.options.model, prompt_len = prompt.len()))]
    async fn summarize_video(&self, video_id: &VideoId, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.options.max_tokens,
                temperature: self.options.temperature,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.options.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(VENDOR, e))?;

        let body: GenerateContentResponse = read_json(VENDOR, response).await?;
        let summary = body.text().trim().to_string();

        if summary.is_empty() {
            let message = match body.block_reason() {
                Some(reason) => format!("Prompt blocked: {}", reason),
                None => "Empty response from model".to_string(),
            };
            return Err(TldwError::provider(VENDOR, message));
        }

        debug!("Generated summary for {} ({} chars)", video_id, summary.len());
        Ok(summary)
    }
}
