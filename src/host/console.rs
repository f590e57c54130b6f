//! Console notification sink.

use super::Notifier;
use crate::cli::Output;
use indicatif::ProgressBar;

/// Prints notifications to the terminal.
///
/// When attached to a progress indicator, messages are printed around it so
/// the spinner line is not garbled.
#[derive(Default, Clone)]
pub struct ConsoleNotifier {
    progress: Option<ProgressBar>,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(progress: ProgressBar) -> Self {
        Self {
            progress: Some(progress),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        match &self.progress {
            Some(pb) => pb.suspend(|| Output::info(message)),
            None => Output::info(message),
        }
    }
}
