//! Pipeline orchestrator for tldw.
//!
//! Coordinates the summary pipeline: reference → transcript → prompt →
//! provider → formatted note fragment. Three triggers feed the same
//! single-flight run:
//!
//! - **Command**: summarize the selected URL (or one typed at a prompt) and
//!   insert the result at the selection.
//! - **Paste**: summarize a pasted URL shortly after the paste settles.
//! - **Auto-detect**: summarize a web-clipped note whose front-matter `source`
//!   is a video, append the result and mark the note as summarized.

mod deferred;
mod lock;

pub use deferred::DeferredRun;
pub use lock::{ProcessingGuard, ProcessingLock};

use crate::config::Settings;
use crate::error::{ConfigurationError, FailureKind, Result, TldwError};
use crate::format::format_summary;
use crate::host::{DocumentSurface, Frontmatter, Notifier, SettingsStore};
use crate::http::create_client_with_timeout;
use crate::prompt::PromptBuilder;
use crate::provider::{create_provider, Summarizer};
use crate::transcript::{thumbnail_url, TranscriptFetcher, YoutubeTranscriptFetcher};
use crate::video::{extract_video_id, is_video_reference};
use serde_yaml::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Front-matter key holding the clipped page URL.
pub const SOURCE_KEY: &str = "source";

/// Front-matter key marking a note as already summarized.
pub const SUMMARIZED_KEY: &str = "summarized";

const STARTED_MESSAGE: &str = "Generating summary...";
const SUCCESS_MESSAGE: &str = "Summary generated successfully!";

/// Which trigger initiated a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Command,
    Paste,
    AutoDetect,
}

/// A single pipeline invocation.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub reference: String,
    pub trigger: TriggerKind,
}

impl PipelineRequest {
    pub fn new(reference: impl Into<String>, trigger: TriggerKind) -> Self {
        Self {
            reference: reference.into(),
            trigger,
        }
    }
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineResult {
    Success { document: String },
    Failure { kind: FailureKind, message: String },
}

impl PipelineResult {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineResult::Success { .. })
    }

    /// The rendered document, for successful runs.
    pub fn document(&self) -> Option<&str> {
        match self {
            PipelineResult::Success { document } => Some(document),
            PipelineResult::Failure { .. } => None,
        }
    }

    /// The failure classification, for failed runs.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            PipelineResult::Success { .. } => None,
            PipelineResult::Failure { kind, .. } => Some(*kind),
        }
    }
}

impl From<TldwError> for PipelineResult {
    fn from(err: TldwError) -> Self {
        PipelineResult::Failure {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Observable pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running,
}

/// The summary pipeline and its triggers.
pub struct Orchestrator {
    settings: Arc<dyn SettingsStore>,
    fetcher: Arc<dyn TranscriptFetcher>,
    provider: Option<Arc<dyn Summarizer>>,
    document: Arc<dyn DocumentSurface>,
    notifier: Arc<dyn Notifier>,
    lock: ProcessingLock,
}

impl Orchestrator {
    /// Create an orchestrator backed by YouTube and the selected model's provider.
    ///
    /// A provider that cannot be constructed is logged and left unset; runs
    /// then fail their precondition check.
    pub fn new(
        settings: Settings,
        document: Arc<dyn DocumentSurface>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let http = create_client_with_timeout(settings.request_timeout())?;

        let fetcher: Arc<dyn TranscriptFetcher> = Arc::new(YoutubeTranscriptFetcher::new(
            http.clone(),
            &settings.youtube.language,
        ));

        let provider = match settings.selected_model() {
            Some(model) => match create_provider(&model, http) {
                Ok(provider) => Some(provider),
                Err(e) => {
                    warn!("Summarization provider unavailable: {}", e);
                    None
                }
            },
            None => None,
        };

        Ok(Self::with_components(
            Arc::new(settings),
            fetcher,
            provider,
            document,
            notifier,
        ))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Arc<dyn SettingsStore>,
        fetcher: Arc<dyn TranscriptFetcher>,
        provider: Option<Arc<dyn Summarizer>>,
        document: Arc<dyn DocumentSurface>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            settings,
            fetcher,
            provider,
            document,
            notifier,
            lock: ProcessingLock::new(),
        }
    }

    pub fn state(&self) -> PipelineState {
        if self.lock.is_held() {
            PipelineState::Running
        } else {
            PipelineState::Idle
        }
    }

    /// Run the pipeline once. Never delivers; callers decide where output goes.
    #[instrument(skip(self, request), fields(trigger = ?request.trigger))]
    pub async fn run(&self, request: &PipelineRequest) -> PipelineResult {
        match self.execute(request).await {
            Ok(document) => PipelineResult::Success { document },
            Err(e) => {
                warn!("Summary pipeline failed: {}", e);
                PipelineResult::from(e)
            }
        }
    }

    async fn execute(&self, request: &PipelineRequest) -> Result<String> {
        if self.lock.is_held() {
            return Err(TldwError::AlreadyProcessing);
        }

        let provider = self.check_preconditions()?;

        // Losing the race between the idle check and acquisition is still a rejection.
        let _guard = self.lock.try_acquire().ok_or(TldwError::AlreadyProcessing)?;

        let video_id = extract_video_id(&request.reference)?;
        self.notifier.notify(STARTED_MESSAGE);
        info!("Summarizing video {}", video_id);

        let transcript = self.fetcher.fetch_transcript(&video_id).await?;
        debug!("Transcript has {} lines", transcript.lines.len());

        let prompt = PromptBuilder::new(&self.settings.custom_prompt())
            .build_prompt(&transcript.text());

        let summary = provider.summarize_video(&video_id, &prompt).await?;

        Ok(format_summary(
            &transcript,
            &thumbnail_url(&video_id),
            request.reference.trim(),
            &summary,
        ))
    }

    /// Model selected, credential present, provider constructed.
    fn check_preconditions(&self) -> Result<Arc<dyn Summarizer>> {
        let model = self
            .settings
            .selected_model()
            .ok_or(ConfigurationError::NoModelSelected)?;

        if !model.has_credential() {
            return Err(ConfigurationError::MissingCredential(model.name).into());
        }

        self.provider
            .clone()
            .ok_or_else(|| ConfigurationError::ProviderUninitialized.into())
    }

    /// Run, deliver on success, and report the outcome.
    async fn dispatch<F>(&self, request: PipelineRequest, deliver: F) -> PipelineResult
    where
        F: FnOnce(&str) -> Result<()>,
    {
        let result = match self.run(&request).await {
            PipelineResult::Success { document } => match deliver(&document) {
                Ok(()) => {
                    self.notifier.notify(SUCCESS_MESSAGE);
                    PipelineResult::Success { document }
                }
                Err(e) => {
                    warn!("Failed to deliver summary: {}", e);
                    PipelineResult::from(e)
                }
            },
            failure => failure,
        };

        self.report_failure(&result);
        result
    }

    fn report_failure(&self, result: &PipelineResult) {
        if let PipelineResult::Failure { message, .. } = result {
            self.notifier.notify(message);
        }
    }

    /// Command trigger: summarize the selected URL, or ask for one.
    pub async fn on_command(&self) -> PipelineResult {
        let reference = match self.command_reference() {
            Ok(reference) => reference,
            Err(e) => {
                let failure = PipelineResult::from(e);
                self.report_failure(&failure);
                return failure;
            }
        };

        let request = PipelineRequest::new(reference, TriggerKind::Command);
        self.dispatch(request, |document| self.document.replace_selection(document))
            .await
    }

    fn command_reference(&self) -> Result<String> {
        // Do not prompt for input that would be rejected anyway.
        if self.lock.is_held() {
            return Err(TldwError::AlreadyProcessing);
        }

        let selection = self.document.selection()?;
        if is_video_reference(&selection) {
            return Ok(selection.trim().to_string());
        }

        self.document
            .prompt_reference()?
            .ok_or_else(|| TldwError::NotAReference("no video URL provided".to_string()))
    }

    /// Paste trigger: schedule a summary of the pasted URL.
    ///
    /// Returns `None` when paste summaries are disabled or the text is not a
    /// video URL. The returned handle may be dropped (fire-and-forget).
    pub fn on_paste(self: &Arc<Self>, pasted: &str) -> Option<DeferredRun> {
        if !self.settings.auto_summarize_pasted_urls() || !is_video_reference(pasted) {
            return None;
        }

        let orchestrator = Arc::clone(self);
        let request = PipelineRequest::new(pasted.trim(), TriggerKind::Paste);
        debug!("Scheduling paste-triggered summary");

        // The lock is only checked once the delay has elapsed, so a run that
        // starts inside the window wins and this one is rejected. Without a
        // task queue the gap between the delay and the check stays open.
        Some(DeferredRun::schedule(self.settings.paste_delay(), async move {
            let document = Arc::clone(&orchestrator.document);
            orchestrator
                .dispatch(request, move |summary| document.replace_selection(summary))
                .await
        }))
    }

    /// Auto-detect trigger: summarize a web-clipped note once.
    ///
    /// Returns `None` when the trigger does not apply to the note.
    pub async fn on_metadata_change(&self, target: &Path) -> Option<PipelineResult> {
        if !self.settings.auto_summarize_webclips() {
            return None;
        }

        let frontmatter = match self.document.read_frontmatter(target) {
            Ok(frontmatter) => frontmatter,
            Err(e) => {
                debug!("Skipping {}: {}", target.display(), e);
                return None;
            }
        };

        if is_summarized(&frontmatter) {
            debug!("{} is already summarized", target.display());
            return None;
        }

        let source = frontmatter.get(SOURCE_KEY).and_then(Value::as_str)?;
        if !is_video_reference(source) {
            return None;
        }

        let request = PipelineRequest::new(source.trim(), TriggerKind::AutoDetect);
        let result = self
            .dispatch(request, |document| {
                // One write, so a failure cannot leave the summary without its marker.
                self.document.append_with_frontmatter(
                    target,
                    &format!("\n{}", document),
                    &mut |fm: &mut Frontmatter| {
                        fm.insert(Value::String(SUMMARIZED_KEY.to_string()), Value::Bool(true));
                    },
                )
            })
            .await;

        Some(result)
    }
}

fn is_summarized(frontmatter: &Frontmatter) -> bool {
    matches!(frontmatter.get(SUMMARIZED_KEY), Some(Value::Bool(true)))
}

#[cfg(test)]
mod tests;
