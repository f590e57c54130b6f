//! CLI command implementations.

mod clip;
mod config;
mod doctor;
mod paste;
mod summarize;
mod watch;

pub use clip::run_clip;
pub use config::run_config;
pub use doctor::run_doctor;
pub use paste::run_paste;
pub use summarize::run_summarize;
pub use watch::run_watch;

use crate::config::Settings;
use crate::host::{ConsoleNotifier, DocumentSurface, Notifier};
use crate::orchestrator::{Orchestrator, PipelineResult};
use std::sync::Arc;

/// Build an orchestrator wired to the given host collaborators.
fn build_orchestrator(
    settings: Settings,
    document: Arc<dyn DocumentSurface>,
    notifier: Arc<dyn Notifier>,
) -> anyhow::Result<Arc<Orchestrator>> {
    Ok(Arc::new(Orchestrator::new(settings, document, notifier)?))
}

fn console_notifier() -> Arc<dyn Notifier> {
    Arc::new(ConsoleNotifier::new())
}

/// Exit non-zero after a failed run. The failure was already reported.
fn exit_on_failure(result: &PipelineResult) {
    if !result.is_success() {
        std::process::exit(1);
    }
}
