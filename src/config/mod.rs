//! Configuration module for tldw.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, SummaryPrompts, DEFAULT_SUMMARY_INSTRUCTION};
pub use settings::{
    GeneralSettings, ModelSettings, PromptSettings, Settings, SummarySettings, YoutubeSettings,
};
