//! Clip command - the auto-detect trigger over web-clipped notes.

use super::{build_orchestrator, console_notifier};
use crate::cli::Output;
use crate::config::Settings;
use crate::host::NoteSurface;
use anyhow::Result;
use std::sync::Arc;

/// Summarize each web-clipped note whose front-matter source is a video.
pub async fn run_clip(files: &[String], settings: Settings) -> Result<()> {
    if !settings.summary.auto_summarize_webclips {
        Output::warning("Web clip summaries are disabled (summary.auto_summarize_webclips).");
        return Ok(());
    }

    let orchestrator = build_orchestrator(settings, Arc::new(NoteSurface::new()), console_notifier())?;

    let mut failed = 0;
    for file in files {
        let path = Settings::expand_path(file);
        match orchestrator.on_metadata_change(&path).await {
            Some(result) if result.is_success() => {
                Output::success(&format!("Summarized {}", path.display()));
            }
            Some(_) => failed += 1,
            None => Output::info(&format!("Skipped {}", path.display())),
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} note(s) failed", failed, files.len());
    }
    Ok(())
}
