//! Watch command - fire the auto-detect trigger as notes change.

use super::build_orchestrator;
use crate::cli::Output;
use crate::config::Settings;
use crate::host::{ConsoleNotifier, NoteSurface};
use anyhow::Result;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Poll `dir` for new or modified Markdown notes until interrupted.
pub async fn run_watch(dir: &str, interval_secs: u64, initial: bool, settings: Settings) -> Result<()> {
    let root = Settings::expand_path(dir);
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }
    if !settings.summary.auto_summarize_webclips {
        Output::warning("Web clip summaries are disabled (summary.auto_summarize_webclips).");
    }

    let spinner = Output::spinner(&format!("Watching {} (Ctrl+C to stop)", root.display()));
    let notifier = Arc::new(ConsoleNotifier::with_progress(spinner.clone()));
    let orchestrator = build_orchestrator(settings, Arc::new(NoteSurface::new()), notifier)?;

    let mut seen = if initial { HashMap::new() } else { scan(&root) };
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let mut current = scan(&root);
                for path in changed_notes(&seen, &current) {
                    debug!("Note changed: {}", path.display());
                    if let Some(result) = orchestrator.on_metadata_change(&path).await {
                        if result.is_success() {
                            spinner.suspend(|| Output::success(&format!("Summarized {}", path.display())));
                        }
                    }
                    // Our own edits are not changes.
                    if let Ok(modified) = std::fs::metadata(&path).and_then(|m| m.modified()) {
                        current.insert(path, modified);
                    }
                }
                seen = current;
            }
            _ = &mut shutdown => {
                spinner.finish_and_clear();
                Output::info("Stopped watching.");
                return Ok(());
            }
        }
    }
}

/// Modification times of all Markdown notes under `root`, skipping hidden entries.
fn scan(root: &Path) -> HashMap<PathBuf, SystemTime> {
    let mut notes = HashMap::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Failed to read entry under {}: {}", root.display(), err);
                None
            }
        })
    {
        if !entry.file_type().is_file() || !entry.path().extension().is_some_and(|ext| ext == "md") {
            continue;
        }
        if let Ok(modified) = entry.metadata().map_err(io::Error::from).and_then(|m| m.modified()) {
            notes.insert(entry.into_path(), modified);
        }
    }

    notes
}

/// Notes that are new or whose modification time changed, in path order.
fn changed_notes(
    before: &HashMap<PathBuf, SystemTime>,
    after: &HashMap<PathBuf, SystemTime>,
) -> Vec<PathBuf> {
    let mut changed: Vec<PathBuf> = after
        .iter()
        .filter(|(path, modified)| before.get(*path) != Some(*modified))
        .map(|(path, _)| path.clone())
        .collect();
    changed.sort();
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_finds_markdown_notes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "a").unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("c.md"), "c").unwrap();
        std::fs::create_dir(dir.path().join(".obsidian")).unwrap();
        std::fs::write(dir.path().join(".obsidian").join("d.md"), "d").unwrap();

        let notes = scan(dir.path());
        assert_eq!(notes.len(), 2);
        assert!(notes.contains_key(&dir.path().join("a.md")));
        assert!(notes.contains_key(&dir.path().join("sub").join("c.md")));
    }

    #[test]
    fn test_scan_root_inside_hidden_directory() {
        let dir = tempfile::Builder::new().prefix(".vault").tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "a").unwrap();
        std::fs::create_dir(dir.path().join(".trash")).unwrap();
        std::fs::write(dir.path().join(".trash").join("b.md"), "b").unwrap();

        let notes = scan(dir.path());
        assert_eq!(notes.keys().collect::<Vec<_>>(), vec![&dir.path().join("a.md")]);
    }

    #[test]
    fn test_changed_notes() {
        let t0 = SystemTime::UNIX_EPOCH;
        let t1 = t0 + Duration::from_secs(1);

        let before = HashMap::from([(PathBuf::from("a.md"), t0), (PathBuf::from("b.md"), t0)]);
        let after = HashMap::from([
            (PathBuf::from("a.md"), t0),
            (PathBuf::from("b.md"), t1),
            (PathBuf::from("c.md"), t0),
        ]);

        assert_eq!(
            changed_notes(&before, &after),
            vec![PathBuf::from("b.md"), PathBuf::from("c.md")]
        );
    }
}
