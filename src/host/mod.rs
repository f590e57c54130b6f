//! Host collaborators.
//!
//! The pipeline talks to its surroundings only through these traits: the
//! document being edited, the settings store and the notification sink. The
//! CLI provides file-backed implementations; tests provide in-memory ones.

mod console;
mod frontmatter;
mod notes;

pub use console::ConsoleNotifier;
pub use frontmatter::{parse_frontmatter, render_document, split_frontmatter, Frontmatter};
pub use notes::NoteSurface;

use crate::error::Result;
use crate::provider::ModelConfig;
use std::path::Path;
use std::time::Duration;

/// Default delay between a paste and the deferred pipeline run.
pub const DEFAULT_PASTE_DELAY: Duration = Duration::from_millis(500);

/// The document editing surface.
pub trait DocumentSurface: Send + Sync {
    /// Currently selected text (empty when nothing is selected).
    fn selection(&self) -> Result<String>;

    /// Replace the selection (or insert at the cursor) with `text`.
    fn replace_selection(&self, text: &str) -> Result<()>;

    /// Ask the user for a video URL. `None` when the user declines.
    fn prompt_reference(&self) -> Result<Option<String>>;

    /// Append `text` to the body of `target`.
    fn append(&self, target: &Path, text: &str) -> Result<()>;

    /// Read the front-matter of `target` (empty when there is none).
    fn read_frontmatter(&self, target: &Path) -> Result<Frontmatter>;

    /// Rewrite the front-matter of `target` through `mutator`.
    fn write_frontmatter(
        &self,
        target: &Path,
        mutator: &mut dyn FnMut(&mut Frontmatter),
    ) -> Result<()>;

    /// Append `text` to the body of `target` and rewrite its front-matter
    /// through `mutator` as one write: either both changes land or neither does.
    fn append_with_frontmatter(
        &self,
        target: &Path,
        text: &str,
        mutator: &mut dyn FnMut(&mut Frontmatter),
    ) -> Result<()>;
}

/// Read-only view of the user's settings.
pub trait SettingsStore: Send + Sync {
    /// The selected model, if one is selected.
    fn selected_model(&self) -> Option<ModelConfig>;

    /// Custom summary instruction (empty for the built-in default).
    fn custom_prompt(&self) -> String;

    /// Summarize web-clipped notes whose front-matter `source` is a video.
    fn auto_summarize_webclips(&self) -> bool;

    /// Summarize video URLs as they are pasted.
    fn auto_summarize_pasted_urls(&self) -> bool;

    /// How long a paste settles before the pipeline runs.
    fn paste_delay(&self) -> Duration {
        DEFAULT_PASTE_DELAY
    }
}

/// Fire-and-forget user notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}
