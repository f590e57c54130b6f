use super::*;
use crate::provider::ModelConfig;
use crate::transcript::{Transcript, TranscriptLine};
use crate::video::VideoId;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

const URL: &str = "https://youtu.be/abc123";

struct StubSettings {
    model: Option<ModelConfig>,
    prompt: String,
    webclips: bool,
    paste: bool,
}

impl Default for StubSettings {
    fn default() -> Self {
        Self {
            model: Some(ModelConfig {
                name: "stub".to_string(),
                provider: "openai".to_string(),
                model: "stub-model".to_string(),
                api_key: Some("sk-test".to_string()),
                base_url: None,
                max_tokens: 1000,
                temperature: 0.7,
            }),
            prompt: "Summarize:".to_string(),
            webclips: true,
            paste: true,
        }
    }
}

impl SettingsStore for StubSettings {
    fn selected_model(&self) -> Option<ModelConfig> {
        self.model.clone()
    }

    fn custom_prompt(&self) -> String {
        self.prompt.clone()
    }

    fn auto_summarize_webclips(&self) -> bool {
        self.webclips
    }

    fn auto_summarize_pasted_urls(&self) -> bool {
        self.paste
    }

    fn paste_delay(&self) -> Duration {
        Duration::from_millis(10)
    }
}

#[derive(Default)]
struct StubFetcher {
    calls: AtomicUsize,
    delay: Duration,
    unavailable: bool,
}

#[async_trait]
impl TranscriptFetcher for StubFetcher {
    async fn fetch_transcript(&self, video_id: &VideoId) -> Result<Transcript> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.unavailable {
            return Err(TldwError::TranscriptUnavailable(video_id.to_string()));
        }
        Ok(Transcript {
            video_id: video_id.clone(),
            title: "T".to_string(),
            author: "A".to_string(),
            channel_url: "C".to_string(),
            lines: vec![TranscriptLine::new("hi", 0.0)],
        })
    }
}

#[derive(Default)]
struct StubSummarizer {
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

impl StubSummarizer {
    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl Summarizer for StubSummarizer {
    fn vendor(&self) -> &'static str {
        "Stub"
    }

    async fn summarize_video(&self, _video_id: &VideoId, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(TldwError::provider("Stub", "quota exceeded"));
        }
        Ok("Summary text".to_string())
    }
}

#[derive(Default)]
struct MemoryDocument {
    selection: Mutex<String>,
    prompt_answer: Option<String>,
    prompted: AtomicUsize,
    inserted: Mutex<Vec<String>>,
    appended: Mutex<Vec<(PathBuf, String)>>,
    frontmatter: Mutex<Frontmatter>,
    mutations: AtomicUsize,
    read_only: bool,
    frontmatter_fails: bool,
}

impl MemoryDocument {
    fn with_selection(selection: &str) -> Self {
        Self {
            selection: Mutex::new(selection.to_string()),
            ..Self::default()
        }
    }

    fn web_clip(source: &str) -> Self {
        let mut fm = Frontmatter::new();
        fm.insert(SOURCE_KEY.into(), source.into());
        Self {
            frontmatter: Mutex::new(fm),
            ..Self::default()
        }
    }

    fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(TldwError::Document("note is read-only".to_string()));
        }
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl DocumentSurface for MemoryDocument {
    fn selection(&self) -> Result<String> {
        Ok(self.selection.lock().unwrap().clone())
    }

    fn replace_selection(&self, text: &str) -> Result<()> {
        self.check_writable()?;
        self.inserted.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn prompt_reference(&self) -> Result<Option<String>> {
        self.prompted.fetch_add(1, Ordering::SeqCst);
        Ok(self.prompt_answer.clone())
    }

    fn append(&self, target: &Path, text: &str) -> Result<()> {
        self.check_writable()?;
        self.appended
            .lock()
            .unwrap()
            .push((target.to_path_buf(), text.to_string()));
        Ok(())
    }

    fn read_frontmatter(&self, _target: &Path) -> Result<Frontmatter> {
        Ok(self.frontmatter.lock().unwrap().clone())
    }

    fn write_frontmatter(
        &self,
        _target: &Path,
        mutator: &mut dyn FnMut(&mut Frontmatter),
    ) -> Result<()> {
        self.check_writable()?;
        if self.frontmatter_fails {
            return Err(TldwError::Document("front-matter write failed".to_string()));
        }
        mutator(&mut self.frontmatter.lock().unwrap());
        Ok(())
    }

    fn append_with_frontmatter(
        &self,
        target: &Path,
        text: &str,
        mutator: &mut dyn FnMut(&mut Frontmatter),
    ) -> Result<()> {
        self.check_writable()?;
        if self.frontmatter_fails {
            return Err(TldwError::Document("front-matter write failed".to_string()));
        }
        self.appended
            .lock()
            .unwrap()
            .push((target.to_path_buf(), text.to_string()));
        mutator(&mut self.frontmatter.lock().unwrap());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

struct Harness {
    orchestrator: Arc<Orchestrator>,
    fetcher: Arc<StubFetcher>,
    summarizer: Arc<StubSummarizer>,
    document: Arc<MemoryDocument>,
    notifier: Arc<RecordingNotifier>,
}

impl Harness {
    fn new(settings: StubSettings, fetcher: StubFetcher, document: MemoryDocument) -> Self {
        Self::build(settings, fetcher, StubSummarizer::default(), document, true)
    }

    fn build(
        settings: StubSettings,
        fetcher: StubFetcher,
        summarizer: StubSummarizer,
        document: MemoryDocument,
        with_provider: bool,
    ) -> Self {
        let fetcher = Arc::new(fetcher);
        let summarizer = Arc::new(summarizer);
        let document = Arc::new(document);
        let notifier = Arc::new(RecordingNotifier::default());

        let provider: Option<Arc<dyn Summarizer>> = if with_provider {
            Some(summarizer.clone())
        } else {
            None
        };

        let orchestrator = Arc::new(Orchestrator::with_components(
            Arc::new(settings),
            fetcher.clone(),
            provider,
            document.clone(),
            notifier.clone(),
        ));

        Self {
            orchestrator,
            fetcher,
            summarizer,
            document,
            notifier,
        }
    }

    fn fetch_calls(&self) -> usize {
        self.fetcher.calls.load(Ordering::SeqCst)
    }
}

fn expected_document() -> String {
    "# T\n\n\
     ![Thumbnail](https://img.youtube.com/vi/abc123/maxresdefault.jpg)\n\n\
     👤 [A](C) | 🔗 [Watch video](https://youtu.be/abc123)\n\n\
     Summary text"
        .to_string()
}

#[tokio::test]
async fn test_run_end_to_end() {
    let h = Harness::new(StubSettings::default(), StubFetcher::default(), MemoryDocument::default());

    let result = h
        .orchestrator
        .run(&PipelineRequest::new(URL, TriggerKind::Command))
        .await;

    assert_eq!(
        result,
        PipelineResult::Success {
            document: expected_document()
        }
    );
    assert_eq!(*h.summarizer.prompts.lock().unwrap(), vec!["Summarize:\nhi".to_string()]);
    assert_eq!(h.orchestrator.state(), PipelineState::Idle);
    // run() itself never delivers.
    assert_eq!(h.document.mutation_count(), 0);
}

#[tokio::test]
async fn test_concurrent_runs_are_rejected() {
    let fetcher = StubFetcher {
        delay: Duration::from_millis(100),
        ..StubFetcher::default()
    };
    let h = Harness::new(StubSettings::default(), fetcher, MemoryDocument::default());
    let request = PipelineRequest::new(URL, TriggerKind::Command);

    let (first, second) = tokio::join!(h.orchestrator.run(&request), h.orchestrator.run(&request));

    let outcomes = [&first, &second];
    assert_eq!(outcomes.iter().filter(|r| r.is_success()).count(), 1);
    assert_eq!(
        outcomes
            .iter()
            .filter(|r| r.failure_kind() == Some(FailureKind::AlreadyProcessing))
            .count(),
        1
    );
    assert_eq!(h.fetch_calls(), 1);
    assert_eq!(h.summarizer.calls(), 1);
}

#[tokio::test]
async fn test_state_while_running() {
    let fetcher = StubFetcher {
        delay: Duration::from_millis(50),
        ..StubFetcher::default()
    };
    let h = Harness::new(StubSettings::default(), fetcher, MemoryDocument::default());
    let orchestrator = h.orchestrator.clone();

    let task = tokio::spawn(async move {
        orchestrator
            .run(&PipelineRequest::new(URL, TriggerKind::Command))
            .await
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(h.orchestrator.state(), PipelineState::Running);

    assert!(task.await.unwrap().is_success());
    assert_eq!(h.orchestrator.state(), PipelineState::Idle);
}

#[tokio::test]
async fn test_no_model_selected() {
    let settings = StubSettings {
        model: None,
        ..StubSettings::default()
    };
    let h = Harness::new(settings, StubFetcher::default(), MemoryDocument::with_selection(URL));

    let result = h.orchestrator.on_command().await;

    assert_eq!(result.failure_kind(), Some(FailureKind::Configuration));
    assert_eq!(h.fetch_calls(), 0);
    assert_eq!(h.summarizer.calls(), 0);
    assert_eq!(h.document.mutation_count(), 0);
    assert_eq!(
        h.notifier.messages(),
        vec![TldwError::from(ConfigurationError::NoModelSelected).to_string()]
    );
}

#[tokio::test]
async fn test_missing_credential() {
    let mut settings = StubSettings::default();
    if let Some(model) = settings.model.as_mut() {
        model.api_key = Some("   ".to_string());
    }
    let h = Harness::new(settings, StubFetcher::default(), MemoryDocument::default());

    let result = h
        .orchestrator
        .run(&PipelineRequest::new(URL, TriggerKind::Command))
        .await;

    match result {
        PipelineResult::Failure { kind, message } => {
            assert_eq!(kind, FailureKind::Configuration);
            assert!(message.contains("'stub'"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(h.fetch_calls(), 0);
}

#[tokio::test]
async fn test_provider_not_initialized() {
    let h = Harness::build(
        StubSettings::default(),
        StubFetcher::default(),
        StubSummarizer::default(),
        MemoryDocument::default(),
        false,
    );

    let result = h
        .orchestrator
        .run(&PipelineRequest::new(URL, TriggerKind::Command))
        .await;

    assert_eq!(result.failure_kind(), Some(FailureKind::Configuration));
    assert_eq!(h.fetch_calls(), 0);
}

#[tokio::test]
async fn test_not_a_reference() {
    let h = Harness::new(StubSettings::default(), StubFetcher::default(), MemoryDocument::default());

    let result = h
        .orchestrator
        .run(&PipelineRequest::new("https://vimeo.com/123", TriggerKind::Command))
        .await;

    assert_eq!(result.failure_kind(), Some(FailureKind::NotAReference));
    assert_eq!(h.fetch_calls(), 0);
    assert!(h.notifier.messages().is_empty());
    assert_eq!(h.orchestrator.state(), PipelineState::Idle);
}

#[tokio::test]
async fn test_command_delivers_at_selection() {
    let h = Harness::new(
        StubSettings::default(),
        StubFetcher::default(),
        MemoryDocument::with_selection(&format!("  {}\n", URL)),
    );

    let result = h.orchestrator.on_command().await;

    assert!(result.is_success());
    assert_eq!(*h.document.inserted.lock().unwrap(), vec![expected_document()]);
    assert_eq!(h.document.prompted.load(Ordering::SeqCst), 0);
    assert_eq!(
        h.notifier.messages(),
        vec![STARTED_MESSAGE.to_string(), SUCCESS_MESSAGE.to_string()]
    );
}

#[tokio::test]
async fn test_command_prompts_for_reference() {
    let document = MemoryDocument {
        prompt_answer: Some(URL.to_string()),
        ..MemoryDocument::with_selection("some prose")
    };
    let h = Harness::new(StubSettings::default(), StubFetcher::default(), document);

    let result = h.orchestrator.on_command().await;

    assert!(result.is_success());
    assert_eq!(h.document.prompted.load(Ordering::SeqCst), 1);
    assert_eq!(h.document.inserted.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_command_prompt_declined() {
    let h = Harness::new(StubSettings::default(), StubFetcher::default(), MemoryDocument::default());

    let result = h.orchestrator.on_command().await;

    assert_eq!(result.failure_kind(), Some(FailureKind::NotAReference));
    assert_eq!(h.fetch_calls(), 0);
    assert_eq!(h.notifier.messages().len(), 1);
}

#[tokio::test]
async fn test_failure_is_not_delivered() {
    let summarizer = StubSummarizer {
        fail: true,
        ..StubSummarizer::default()
    };
    let h = Harness::build(
        StubSettings::default(),
        StubFetcher::default(),
        summarizer,
        MemoryDocument::with_selection(URL),
        true,
    );

    let result = h.orchestrator.on_command().await;

    assert_eq!(result.failure_kind(), Some(FailureKind::Provider));
    assert_eq!(h.document.mutation_count(), 0);
    assert_eq!(
        h.notifier.messages(),
        vec![
            STARTED_MESSAGE.to_string(),
            "Stub API error: quota exceeded".to_string()
        ]
    );

    // The lock was released by the failed run.
    assert_eq!(h.orchestrator.state(), PipelineState::Idle);
}

#[tokio::test]
async fn test_transcript_unavailable() {
    let fetcher = StubFetcher {
        unavailable: true,
        ..StubFetcher::default()
    };
    let h = Harness::new(StubSettings::default(), fetcher, MemoryDocument::with_selection(URL));

    let result = h.orchestrator.on_command().await;

    assert_eq!(result.failure_kind(), Some(FailureKind::TranscriptUnavailable));
    assert_eq!(h.summarizer.calls(), 0);
    assert!(h.document.inserted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_delivery_failure_is_reported() {
    let document = MemoryDocument {
        read_only: true,
        ..MemoryDocument::with_selection(URL)
    };
    let h = Harness::new(StubSettings::default(), StubFetcher::default(), document);

    let result = h.orchestrator.on_command().await;

    assert_eq!(result.failure_kind(), Some(FailureKind::Document));
    let messages = h.notifier.messages();
    assert_eq!(messages.len(), 2);
    assert!(!messages.contains(&SUCCESS_MESSAGE.to_string()));
}

#[tokio::test]
async fn test_paste_runs_after_delay() {
    let h = Harness::new(StubSettings::default(), StubFetcher::default(), MemoryDocument::default());

    let run = h.orchestrator.on_paste(URL).expect("paste should schedule a run");
    assert_eq!(h.fetch_calls(), 0);

    let result = run.wait().await.expect("run should complete");
    assert!(result.is_success());
    assert_eq!(*h.document.inserted.lock().unwrap(), vec![expected_document()]);
}

#[tokio::test]
async fn test_paste_ignored() {
    let disabled = StubSettings {
        paste: false,
        ..StubSettings::default()
    };
    let h = Harness::new(disabled, StubFetcher::default(), MemoryDocument::default());
    assert!(h.orchestrator.on_paste(URL).is_none());

    let h = Harness::new(StubSettings::default(), StubFetcher::default(), MemoryDocument::default());
    assert!(h.orchestrator.on_paste("just some text").is_none());
    assert!(h.orchestrator.on_paste(&format!("see {}", URL)).is_none());
}

#[tokio::test]
async fn test_paste_cancelled_before_start() {
    let h = Harness::new(StubSettings::default(), StubFetcher::default(), MemoryDocument::default());

    let mut run = h.orchestrator.on_paste(URL).unwrap();
    assert!(run.cancel());

    assert_eq!(run.wait().await, None);
    assert_eq!(h.fetch_calls(), 0);
    assert_eq!(h.document.mutation_count(), 0);
}

#[tokio::test]
async fn test_paste_rejected_while_running() {
    let fetcher = StubFetcher {
        delay: Duration::from_millis(100),
        ..StubFetcher::default()
    };
    let h = Harness::new(StubSettings::default(), fetcher, MemoryDocument::with_selection(URL));

    let command = h.orchestrator.clone();
    let running = tokio::spawn(async move { command.on_command().await });
    tokio::time::sleep(Duration::from_millis(5)).await;

    let paste = h.orchestrator.on_paste(URL).unwrap().wait().await.unwrap();

    assert_eq!(paste.failure_kind(), Some(FailureKind::AlreadyProcessing));
    assert!(running.await.unwrap().is_success());
    assert_eq!(h.fetch_calls(), 1);
}

#[tokio::test]
async fn test_auto_detect_appends_and_marks() {
    let h = Harness::new(StubSettings::default(), StubFetcher::default(), MemoryDocument::web_clip(URL));
    let note = Path::new("Clippings/video.md");

    let result = h.orchestrator.on_metadata_change(note).await.unwrap();

    assert!(result.is_success());
    assert_eq!(
        *h.document.appended.lock().unwrap(),
        vec![(note.to_path_buf(), format!("\n{}", expected_document()))]
    );
    let fm = h.document.frontmatter.lock().unwrap().clone();
    assert_eq!(fm.get(SUMMARIZED_KEY), Some(&Value::Bool(true)));
    assert_eq!(fm.get(SOURCE_KEY).and_then(Value::as_str), Some(URL));
}

#[tokio::test]
async fn test_auto_detect_is_idempotent() {
    let h = Harness::new(StubSettings::default(), StubFetcher::default(), MemoryDocument::web_clip(URL));
    let note = Path::new("clip.md");

    assert!(h.orchestrator.on_metadata_change(note).await.is_some());
    let mutations = h.document.mutation_count();

    assert!(h.orchestrator.on_metadata_change(note).await.is_none());
    assert_eq!(h.fetch_calls(), 1);
    assert_eq!(h.summarizer.calls(), 1);
    assert_eq!(h.document.mutation_count(), mutations);
}

#[tokio::test]
async fn test_auto_detect_skips() {
    let disabled = StubSettings {
        webclips: false,
        ..StubSettings::default()
    };
    let h = Harness::new(disabled, StubFetcher::default(), MemoryDocument::web_clip(URL));
    assert!(h.orchestrator.on_metadata_change(Path::new("a.md")).await.is_none());

    let h = Harness::new(
        StubSettings::default(),
        StubFetcher::default(),
        MemoryDocument::web_clip("https://example.com/article"),
    );
    assert!(h.orchestrator.on_metadata_change(Path::new("a.md")).await.is_none());

    let h = Harness::new(StubSettings::default(), StubFetcher::default(), MemoryDocument::default());
    assert!(h.orchestrator.on_metadata_change(Path::new("a.md")).await.is_none());

    assert_eq!(h.fetch_calls(), 0);
}

#[tokio::test]
async fn test_auto_detect_write_failure_leaves_note_untouched() {
    let document = MemoryDocument {
        frontmatter_fails: true,
        ..MemoryDocument::web_clip(URL)
    };
    let h = Harness::new(StubSettings::default(), StubFetcher::default(), document);
    let note = Path::new("clip.md");

    for _ in 0..2 {
        let result = h.orchestrator.on_metadata_change(note).await.unwrap();
        assert_eq!(result.failure_kind(), Some(FailureKind::Document));
    }

    assert!(h.document.appended.lock().unwrap().is_empty());
    assert!(h.document.frontmatter.lock().unwrap().get(SUMMARIZED_KEY).is_none());
    assert!(!h.notifier.messages().contains(&SUCCESS_MESSAGE.to_string()));
}

#[tokio::test]
async fn test_command_rejected_while_running_does_not_prompt() {
    let document = MemoryDocument {
        prompt_answer: Some(URL.to_string()),
        ..MemoryDocument::with_selection("some prose")
    };
    let h = Harness::new(StubSettings::default(), StubFetcher::default(), document);
    let _guard = h.orchestrator.lock.try_acquire().unwrap();

    let result = h.orchestrator.on_command().await;

    assert_eq!(result.failure_kind(), Some(FailureKind::AlreadyProcessing));
    assert_eq!(h.document.prompted.load(Ordering::SeqCst), 0);
    assert_eq!(h.fetch_calls(), 0);
    assert_eq!(h.notifier.messages().len(), 1);
}

#[tokio::test]
async fn test_auto_detect_failure_leaves_note_unmarked() {
    let fetcher = StubFetcher {
        unavailable: true,
        ..StubFetcher::default()
    };
    let h = Harness::new(StubSettings::default(), fetcher, MemoryDocument::web_clip(URL));

    let result = h.orchestrator.on_metadata_change(Path::new("a.md")).await.unwrap();

    assert_eq!(result.failure_kind(), Some(FailureKind::TranscriptUnavailable));
    assert_eq!(h.document.mutation_count(), 0);
    assert!(h.document.frontmatter.lock().unwrap().get(SUMMARIZED_KEY).is_none());
}

#[test]
fn test_runs_on_plain_runtime() {
    let h = Harness::new(StubSettings::default(), StubFetcher::default(), MemoryDocument::default());

    let result = tokio_test::block_on(
        h.orchestrator
            .run(&PipelineRequest::new(URL, TriggerKind::AutoDetect)),
    );

    assert!(result.is_success());
}

#[test]
fn test_pipeline_result_from_error() {
    let result = PipelineResult::from(TldwError::AlreadyProcessing);
    assert_eq!(result.failure_kind(), Some(FailureKind::AlreadyProcessing));
    assert!(!result.is_success());
    assert!(result.document().is_none());
}

#[test]
fn test_is_summarized() {
    let mut fm = Frontmatter::new();
    assert!(!is_summarized(&fm));

    fm.insert(SUMMARIZED_KEY.into(), Value::Bool(false));
    assert!(!is_summarized(&fm));

    fm.insert(SUMMARIZED_KEY.into(), Value::Bool(true));
    assert!(is_summarized(&fm));
}
