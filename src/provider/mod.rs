//! Summarization providers.
//!
//! Every vendor implements [`Summarizer`]; [`create_provider`] picks the
//! variant from the model configuration.
//!
//! # Providers
//!
//! - **openai**: Chat Completions through `async-openai` (also works with
//!   OpenAI-compatible gateways via `base_url`).
//! - **anthropic**: Messages API.
//! - **gemini**: Google Generative Language `generateContent`.
//!
//! Providers never retry. A failed call surfaces as a `Provider` error for
//! non-2xx or malformed responses and as a `Network` error for transport
//! failures.

mod anthropic;
mod gemini;
mod openai;

pub use anthropic::AnthropicSummarizer;
pub use gemini::GeminiSummarizer;
pub use openai::OpenAiSummarizer;

use crate::error::{Result, TldwError};
use crate::video::VideoId;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Trait for summarization backends.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Human-readable vendor name used in error messages.
    fn vendor(&self) -> &'static str;

    /// Produce a summary for the video from a fully built prompt.
    async fn summarize_video(&self, video_id: &VideoId, prompt: &str) -> Result<String>;
}

/// Supported summarization vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
    Gemini,
}

impl ProviderKind {
    /// Environment variable consulted when no API key is configured.
    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = TldwError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "chatgpt" => Ok(ProviderKind::OpenAI),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            _ => Err(TldwError::UnsupportedProvider(s.to_string())),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::OpenAI => write!(f, "openai"),
            ProviderKind::Anthropic => write!(f, "anthropic"),
            ProviderKind::Gemini => write!(f, "gemini"),
        }
    }
}

/// The selected model, as handed to the pipeline by the settings store.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Name the user selects the model by.
    pub name: String,
    /// Provider name (openai, anthropic, gemini).
    pub provider: String,
    /// Vendor model identifier.
    pub model: String,
    /// Resolved API key, if any.
    pub api_key: Option<String>,
    /// Endpoint override.
    pub base_url: Option<String>,
    /// Maximum output tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl ModelConfig {
    /// Whether a non-empty credential is present.
    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Construction parameters shared by every provider.
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    pub model: String,
    pub api_key: String,
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Build the summarizer for a model configuration.
///
/// Fails with `UnsupportedProvider` for unknown provider names. Credential
/// presence is left to the caller.
pub fn create_provider(config: &ModelConfig, http: reqwest::Client) -> Result<Arc<dyn Summarizer>> {
    let kind: ProviderKind = config.provider.parse()?;

    let options = ProviderOptions {
        model: config.model.clone(),
        api_key: config.api_key.clone().unwrap_or_default(),
        base_url: config.base_url.clone(),
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    };

    info!("Using {} model {} ({})", kind, config.model, config.name);

    let provider: Arc<dyn Summarizer> = match kind {
        ProviderKind::OpenAI => Arc::new(OpenAiSummarizer::new(options, http)),
        ProviderKind::Anthropic => Arc::new(AnthropicSummarizer::new(options, http)),
        ProviderKind::Gemini => Arc::new(GeminiSummarizer::new(options, http)),
    };

    Ok(provider)
}

/// Map a transport failure.
pub(crate) fn transport_error(vendor: &str, err: reqwest::Error) -> TldwError {
    TldwError::Network(format!("{} request failed: {}", vendor, err))
}

/// Read a JSON response body, mapping non-2xx statuses and malformed bodies
/// to provider errors.
pub(crate) async fn read_json<T: DeserializeOwned>(
    vendor: &str,
    response: reqwest::Response,
) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(vendor, e))?;

    if !status.is_success() {
        return Err(TldwError::provider(vendor, api_error_message(status, &body)));
    }

    serde_json::from_str(&body)
        .map_err(|e| TldwError::provider(vendor, format!("Malformed response: {}", e)))
}

/// Describe a non-2xx response, preferring the vendor's `error.message`.
fn api_error_message(status: reqwest::StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()))
        .unwrap_or_else(|| body.trim().chars().take(200).collect());

    if detail.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, detail)
    }
}
