//! File-backed document surface over Markdown notes.

use super::frontmatter::{parse_frontmatter, render_document, split_frontmatter};
use super::{DocumentSurface, Frontmatter};
use crate::error::{Result, TldwError};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Document surface for the CLI host.
///
/// The "selection" is the text the user handed to the command (typically the
/// pasted URL). Replacing it rewrites its first occurrence in the active note,
/// or appends to the note when the text is not found. Without an active note
/// the output goes to stdout.
pub struct NoteSurface {
    active_note: Option<PathBuf>,
    selection: Mutex<String>,
    interactive: bool,
}

impl NoteSurface {
    pub fn new() -> Self {
        Self {
            active_note: None,
            selection: Mutex::new(String::new()),
            interactive: false,
        }
    }

    /// Set the note that selection edits apply to.
    pub fn with_active_note(mut self, path: impl Into<PathBuf>) -> Self {
        self.active_note = Some(path.into());
        self
    }

    /// Set the current selection.
    pub fn with_selection(self, selection: impl Into<String>) -> Self {
        if let Ok(mut current) = self.selection.lock() {
            *current = selection.into();
        }
        self
    }

    /// Allow prompting on stdin for a missing reference.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn active_note(&self) -> Option<&Path> {
        self.active_note.as_deref()
    }

    fn lock_selection(&self) -> Result<MutexGuard<'_, String>> {
        self.selection
            .lock()
            .map_err(|_| TldwError::Document("selection state poisoned".to_string()))
    }
}

impl Default for NoteSurface {
    fn default() -> Self {
        Self::new()
    }
}

fn read_note(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

/// Append `text` as a new block at the end of `content`.
fn append_block(content: &str, text: &str) -> String {
    let mut out = content.to_string();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(text);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

impl DocumentSurface for NoteSurface {
    fn selection(&self) -> Result<String> {
        Ok(self.lock_selection()?.clone())
    }

    fn replace_selection(&self, text: &str) -> Result<()> {
        let mut selection = self.lock_selection()?;

        match &self.active_note {
            None => println!("{}", text),
            Some(path) => {
                let content = read_note(path)?;
                let updated = if !selection.is_empty() && content.contains(selection.as_str()) {
                    content.replacen(selection.as_str(), text, 1)
                } else if content.is_empty() {
                    append_block(&content, text)
                } else {
                    append_block(&content, &format!("\n{}", text))
                };
                std::fs::write(path, updated)?;
                debug!("Inserted summary into {}", path.display());
            }
        }

        // The cursor now sits after the inserted text.
        selection.clear();
        Ok(())
    }

    fn prompt_reference(&self) -> Result<Option<String>> {
        if !self.interactive {
            return Ok(None);
        }

        eprint!("YouTube URL: ");
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;

        let input = input.trim();
        Ok(if input.is_empty() {
            None
        } else {
            Some(input.to_string())
        })
    }

    fn append(&self, target: &Path, text: &str) -> Result<()> {
        let content = std::fs::read_to_string(target)?;
        std::fs::write(target, append_block(&content, text))?;
        debug!("Appended {} bytes to {}", text.len(), target.display());
        Ok(())
    }

    fn read_frontmatter(&self, target: &Path) -> Result<Frontmatter> {
        let content = std::fs::read_to_string(target)?;
        parse_frontmatter(&content)
    }

    fn write_frontmatter(
        &self,
        target: &Path,
        mutator: &mut dyn FnMut(&mut Frontmatter),
    ) -> Result<()> {
        rewrite_note(target, mutator, |body| body.to_string())
    }

    fn append_with_frontmatter(
        &self,
        target: &Path,
        text: &str,
        mutator: &mut dyn FnMut(&mut Frontmatter),
    ) -> Result<()> {
        rewrite_note(target, mutator, |body| append_block(body, text))?;
        debug!("Appended {} bytes to {}", text.len(), target.display());
        Ok(())
    }
}

/// Rebuild a note from its mutated front-matter and transformed body.
/// Nothing is written unless both render.
fn rewrite_note(
    target: &Path,
    mutator: &mut dyn FnMut(&mut Frontmatter),
    body_fn: impl FnOnce(&str) -> String,
) -> Result<()> {
    let content = std::fs::read_to_string(target)?;
    let mut frontmatter = parse_frontmatter(&content)?;
    let (_, body) = split_frontmatter(&content);

    mutator(&mut frontmatter);

    let updated = render_document(&frontmatter, &body_fn(body))?;
    std::fs::write(target, updated)?;
    Ok(())
}
