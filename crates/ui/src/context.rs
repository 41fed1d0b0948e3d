use std::sync::Arc;

use nobocon_core::Snapshot;
use services::{PersistenceStatus, ProgressService, SaveScheduler};

/// Everything the view layer needs, wired up by the composition root in
/// `crates/app` after startup has run.
#[derive(Clone)]
pub struct AppContext {
    progress: Arc<ProgressService>,
    scheduler: Arc<SaveScheduler>,
    restored: Option<Snapshot>,
    status: PersistenceStatus,
}

impl AppContext {
    #[must_use]
    pub fn new(
        progress: Arc<ProgressService>,
        scheduler: Arc<SaveScheduler>,
        restored: Option<Snapshot>,
    ) -> Self {
        let status = progress.status();
        Self {
            progress,
            scheduler,
            restored,
            status,
        }
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn scheduler(&self) -> Arc<SaveScheduler> {
        Arc::clone(&self.scheduler)
    }

    /// The snapshot the scoreboard starts from: the restored one when a
    /// fresh slot existed, otherwise the canonical initial snapshot.
    #[must_use]
    pub fn initial_snapshot(&self) -> Snapshot {
        self.restored.clone().unwrap_or_else(Snapshot::initial)
    }

    /// Persistence availability as decided by the startup probe.
    #[must_use]
    pub fn persistence_status(&self) -> &PersistenceStatus {
        &self.status
    }
}
