//! Configuration settings for tldw.

use super::Prompts;
use crate::host::SettingsStore;
use crate::provider::{ModelConfig, ProviderKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub summary: SummarySettings,
    pub youtube: YoutubeSettings,
    pub prompts: PromptSettings,
    /// Models available for selection.
    pub models: Vec<ModelSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            summary: SummarySettings::default(),
            youtube: YoutubeSettings::default(),
            prompts: PromptSettings::default(),
            models: default_models(),
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Timeout for each outbound HTTP request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            request_timeout_secs: crate::http::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Summary generation and trigger settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    /// Name of the model (from `[[models]]`) used for summaries.
    pub selected_model: Option<String>,
    /// Inline instruction placed before the transcript. Overrides the prompts directory.
    pub custom_prompt: String,
    /// Maximum output tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Summarize web clips whose front-matter `source` is a YouTube video.
    pub auto_summarize_webclips: bool,
    /// Summarize YouTube URLs as they are pasted.
    pub auto_summarize_pasted_urls: bool,
    /// Delay before a paste-triggered run starts, in milliseconds.
    pub paste_delay_ms: u64,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            selected_model: None,
            custom_prompt: String::new(),
            max_tokens: 1000,
            temperature: 0.7,
            auto_summarize_webclips: false,
            auto_summarize_pasted_urls: false,
            paste_delay_ms: crate::host::DEFAULT_PASTE_DELAY.as_millis() as u64,
        }
    }
}

/// YouTube-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// Preferred caption language.
    pub language: String,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: HashMap<String, String>,
}

/// A model the user can select.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelSettings {
    /// Name used to select this model.
    pub name: String,
    /// Provider (openai, anthropic, gemini).
    pub provider: String,
    /// Vendor model identifier.
    pub model: String,
    /// API key. Prefer `api_key_env` to keep keys out of the config file.
    pub api_key: Option<String>,
    /// Environment variable holding the API key (defaults per provider).
    pub api_key_env: Option<String>,
    /// Endpoint override (OpenAI-compatible gateways, proxies).
    pub base_url: Option<String>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            provider: "openai".to_string(),
            model: String::new(),
            api_key: None,
            api_key_env: None,
            base_url: None,
        }
    }
}

impl ModelSettings {
    fn preset(name: &str, provider: &str, model: &str) -> Self {
        Self {
            name: name.to_string(),
            provider: provider.to_string(),
            model: model.to_string(),
            ..Self::default()
        }
    }

    /// Environment variable consulted for the API key.
    pub fn api_key_env(&self) -> Option<String> {
        self.api_key_env.clone().or_else(|| {
            self.provider
                .parse::<ProviderKind>()
                .ok()
                .map(|kind| kind.default_api_key_env().to_string())
        })
    }

    /// The configured key, falling back to the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                self.api_key_env()
                    .and_then(|var| std::env::var(var).ok())
                    .filter(|k| !k.trim().is_empty())
            })
    }
}

fn default_models() -> Vec<ModelSettings> {
    vec![
        ModelSettings::preset("gpt-4o-mini", "openai", "gpt-4o-mini"),
        ModelSettings::preset("gpt-4o", "openai", "gpt-4o"),
        ModelSettings::preset("claude-haiku", "anthropic", "claude-3-5-haiku-latest"),
        ModelSettings::preset("claude-sonnet", "anthropic", "claude-sonnet-4-20250514"),
        ModelSettings::preset("gemini-flash", "gemini", "gemini-2.0-flash"),
    ]
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::TldwError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tldw")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Look up a model by name.
    pub fn model(&self, name: &str) -> Option<&ModelSettings> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Select a model by name.
    pub fn select_model(&mut self, name: &str) -> crate::error::Result<()> {
        if self.model(name).is_none() {
            return Err(crate::error::TldwError::Config(format!(
                "Unknown model '{}'. Available: {}",
                name,
                self.models
                    .iter()
                    .map(|m| m.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }
        self.summary.selected_model = Some(name.to_string());
        Ok(())
    }

    /// Timeout applied to every outbound request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.general.request_timeout_secs)
    }

    /// Load prompt templates from the custom prompts directory.
    pub fn load_prompts(&self) -> crate::error::Result<Prompts> {
        Prompts::load(
            self.prompts.custom_dir.as_deref(),
            Some(&self.prompts.variables),
        )
    }
}

impl SettingsStore for Settings {
    fn selected_model(&self) -> Option<ModelConfig> {
        let name = self.summary.selected_model.as_deref()?;
        let model = self.model(name)?;

        Some(ModelConfig {
            name: model.name.clone(),
            provider: model.provider.clone(),
            model: model.model.clone(),
            api_key: model.resolve_api_key(),
            base_url: model.base_url.clone(),
            max_tokens: self.summary.max_tokens,
            temperature: self.summary.temperature,
        })
    }

    fn custom_prompt(&self) -> String {
        if !self.summary.custom_prompt.trim().is_empty() {
            return self.summary.custom_prompt.clone();
        }
        match self.load_prompts() {
            Ok(prompts) => prompts.summary_instruction(),
            Err(e) => {
                warn!("Failed to load custom prompts, using default: {}", e);
                String::new()
            }
        }
    }

    fn auto_summarize_webclips(&self) -> bool {
        self.summary.auto_summarize_webclips
    }

    fn auto_summarize_pasted_urls(&self) -> bool {
        self.summary.auto_summarize_pasted_urls
    }

    fn paste_delay(&self) -> Duration {
        Duration::from_millis(self.summary.paste_delay_ms)
    }
}
