//! Prompt templates for tldw.
//!
//! The summary instruction can be customized inline in the config file or by
//! placing a `summary.toml` file in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Built-in summary instruction, used when no custom prompt is configured.
pub const DEFAULT_SUMMARY_INSTRUCTION: &str = r###"Summarize the following YouTube video transcript.

Format the summary in Markdown:
- Start with a one-paragraph overview of the video's main idea
- Follow with a "## Key Points" section listing the most important points as bullets
- End with a "## Takeaways" section with practical conclusions, if any

Skip sponsor segments, subscription requests, intros and outros.
Do not include a title; it is added separately.

Transcript:"###;

/// Collection of prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub summary: SummaryPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for summary generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct SummaryPrompts {
    /// Instruction placed before the transcript. Empty means the built-in default.
    pub instruction: String,
}

impl Prompts {
    /// Load prompts with an optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let summary_path = custom_path.join("summary.toml");
            if summary_path.exists() {
                let content = std::fs::read_to_string(&summary_path)?;
                prompts.summary = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a template using the configured custom variables.
    pub fn render_with_custom(&self, template: &str) -> String {
        Self::render(template, &self.variables)
    }

    /// The summary instruction after variable substitution (may be empty).
    pub fn summary_instruction(&self) -> String {
        self.render_with_custom(&self.summary.instruction)
    }
}
