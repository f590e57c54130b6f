//! Paste command - the paste trigger.

use super::{build_orchestrator, console_notifier, exit_on_failure};
use crate::cli::Output;
use crate::config::Settings;
use crate::host::{DocumentSurface, NoteSurface};
use anyhow::Result;
use std::sync::Arc;

/// Paste `text` into a note and summarize it if it is a video URL.
pub async fn run_paste(text: &str, note: &str, settings: Settings) -> Result<()> {
    if !settings.summary.auto_summarize_pasted_urls {
        Output::warning("Paste summaries are disabled (summary.auto_summarize_pasted_urls).");
    }

    let surface = Arc::new(NoteSurface::new().with_active_note(Settings::expand_path(note)));

    // The pasted text lands in the note first; the summary follows it.
    surface.replace_selection(text)?;

    let orchestrator = build_orchestrator(settings, surface, console_notifier())?;
    let Some(run) = orchestrator.on_paste(text) else {
        tracing::debug!("Pasted text does not trigger a summary");
        return Ok(());
    };

    if let Some(result) = run.wait().await {
        exit_on_failure(&result);
    }
    Ok(())
}
