//! tldw - YouTube summaries for Markdown notes
//!
//! Turns a YouTube URL into a formatted Markdown summary: the video's
//! transcript is fetched, combined with an instruction prompt, summarized by
//! the selected language model and rendered with the video's title, thumbnail
//! and channel.
//!
//! # Architecture
//!
//! - `video` - Video URL recognition and ID extraction
//! - `transcript` - Transcript fetching (YouTube watch page and captions)
//! - `prompt` - Prompt assembly
//! - `provider` - Summarization providers (OpenAI, Anthropic, Gemini)
//! - `format` - Summary document rendering
//! - `orchestrator` - Single-flight pipeline and its triggers
//! - `host` - Document, settings and notification seams, with file-backed
//!   implementations for the CLI
//! - `config` - Configuration management
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tldw::config::Settings;
//! use tldw::host::{ConsoleNotifier, NoteSurface};
//! use tldw::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let surface = NoteSurface::new().with_selection("https://youtu.be/dQw4w9WgXcQ");
//!     let orchestrator = Orchestrator::new(
//!         settings,
//!         Arc::new(surface),
//!         Arc::new(ConsoleNotifier::new()),
//!     )?;
//!
//!     // Prints the summary, since no note is active
//!     let result = orchestrator.on_command().await;
//!     println!("success: {}", result.is_success());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod host;
pub mod http;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod transcript;
pub mod video;

pub use error::{Result, TldwError};
