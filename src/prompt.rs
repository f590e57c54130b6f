//! Prompt construction for summarization.

use crate::config::DEFAULT_SUMMARY_INSTRUCTION;

/// Separator placed between the instruction and the transcript text.
pub const PROMPT_SEPARATOR: &str = "\n";

/// Builds provider-agnostic prompts from an instruction template.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    instruction: String,
}

impl PromptBuilder {
    /// Create a builder. An empty template falls back to the built-in instruction.
    pub fn new(template: &str) -> Self {
        let instruction = if template.trim().is_empty() {
            DEFAULT_SUMMARY_INSTRUCTION.to_string()
        } else {
            template.to_string()
        };
        Self { instruction }
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Combine the instruction with the transcript text.
    pub fn build_prompt(&self, transcript_text: &str) -> String {
        format!("{}{}{}", self.instruction, PROMPT_SEPARATOR, transcript_text)
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new("")
    }
}
