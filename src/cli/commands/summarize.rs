//! Summarize command - the command trigger.

use super::{build_orchestrator, console_notifier, exit_on_failure};
use crate::config::Settings;
use crate::host::NoteSurface;
use anyhow::Result;
use std::sync::Arc;

/// Summarize a video and insert the result into a note (or print it).
pub async fn run_summarize(
    reference: Option<String>,
    note: Option<String>,
    settings: Settings,
) -> Result<()> {
    let mut surface = NoteSurface::new()
        .with_selection(reference.unwrap_or_default())
        .interactive(console::user_attended_stderr());
    if let Some(note) = note {
        surface = surface.with_active_note(Settings::expand_path(&note));
    }

    let orchestrator = build_orchestrator(settings, Arc::new(surface), console_notifier())?;
    let result = orchestrator.on_command().await;

    exit_on_failure(&result);
    Ok(())
}
