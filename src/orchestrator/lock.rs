//! Single-flight processing lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Process-wide flag allowing at most one pipeline run at a time.
///
/// Acquisition hands out a [`ProcessingGuard`]; the lock is released when the
/// guard is dropped, on every exit path including errors and panics.
#[derive(Debug, Clone, Default)]
pub struct ProcessingLock {
    busy: Arc<AtomicBool>,
}

impl ProcessingLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a run currently holds the lock.
    pub fn is_held(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Acquire the lock, or `None` if it is already held.
    pub fn try_acquire(&self) -> Option<ProcessingGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProcessingGuard {
                busy: Arc::clone(&self.busy),
            })
    }
}

/// Holds the processing lock until dropped.
#[must_use = "the lock is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ProcessingGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
