use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use nobocon_core::Snapshot;

use crate::progress::ProgressService;

/// Idle window before a state change is flushed to storage.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(300);

/// Debounced save: every state change replaces the pending timer, so only
/// the most recent snapshot within an idle window is written. At most one
/// timer is pending at a time.
///
/// Losing the last sub-window change on an abrupt process kill is accepted;
/// the write itself is best-effort and never retried.
pub struct SaveScheduler {
    progress: Arc<ProgressService>,
    delay: Duration,
    runtime: Handle,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl SaveScheduler {
    /// Scheduler with the standard debounce window.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn new(progress: Arc<ProgressService>) -> Self {
        Self::with_delay(progress, SAVE_DEBOUNCE)
    }

    /// Scheduler with a custom debounce window (tests use a short one).
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn with_delay(progress: Arc<ProgressService>, delay: Duration) -> Self {
        Self {
            progress,
            delay,
            runtime: Handle::current(),
            pending: Mutex::new(None),
        }
    }

    /// Queue `snapshot` for saving after the debounce window, cancelling any
    /// previously queued save.
    pub fn schedule(&self, snapshot: Snapshot) {
        let progress = Arc::clone(&self.progress);
        let delay = self.delay;
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = progress.save(&snapshot).await {
                // Best-effort: a failed write only costs this window's state.
                eprintln!("save failed: {err}");
            }
        });

        let mut pending = self.pending.lock().expect("pending lock poisoned");
        if let Some(previous) = pending.replace(task) {
            previous.abort();
        }
    }

    /// Drop any queued save without writing it (reset flow).
    pub fn cancel(&self) {
        if let Some(task) = self
            .pending
            .lock()
            .expect("pending lock poisoned")
            .take()
        {
            task.abort();
        }
    }
}
