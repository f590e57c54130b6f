//! OpenAI chat completions provider.

use super::{ProviderOptions, Summarizer};
use crate::error::{Result, TldwError};
use crate::video::VideoId;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use backoff::ExponentialBackoff;
use std::time::Duration;
use tracing::{debug, instrument};

const VENDOR: &str = "OpenAI";

/// OpenAI-backed summarizer.
pub struct OpenAiSummarizer {
    client: Client<OpenAIConfig>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiSummarizer {
    /// Create a summarizer sharing the given HTTP client.
    pub fn new(options: ProviderOptions, http: reqwest::Client) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(options.api_key);
        if let Some(base_url) = options.base_url {
            config = config.with_api_base(base_url.trim_end_matches('/'));
        }

        let client = Client::with_config(config)
            .with_http_client(http)
            .with_backoff(no_retry());

        Self {
            client,
            model: options.model,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        }
    }
}

/// The client retries rate-limited and 5xx responses by default; a zero
/// elapsed-time budget turns that off.
fn no_retry() -> ExponentialBackoff {
    ExponentialBackoff {
        max_elapsed_time: Some(Duration::ZERO),
        ..ExponentialBackoff::default()
    }
}

fn map_openai_error(err: OpenAIError) -> TldwError {
    match err {
        OpenAIError::Reqwest(e) => TldwError::Network(format!("{} request failed: {}", VENDOR, e)),
        OpenAIError::ApiError(api) => TldwError::provider(VENDOR, api.message),
        other => TldwError::provider(VENDOR, other.to_string()),
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    fn vendor(&self) -> &'static str {
        VENDOR
    }

    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn summarize_video(&self, video_id: &VideoId, prompt: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(map_openai_error)?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_completion_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build()
            .map_err(map_openai_error)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        let summary = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| TldwError::provider(VENDOR, "Empty response from model"))?
            .trim()
            .to_string();

        debug!("Generated summary for {} ({} chars)", video_id, summary.len());
        Ok(summary)
    }
}
