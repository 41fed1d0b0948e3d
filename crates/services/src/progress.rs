use std::sync::{Arc, RwLock};

use nobocon_core::{Clock, Snapshot};
use storage::{SnapshotStore, StoreStatus};

use crate::error::ProgressError;

/// Whether saves are flowing to durable storage this session.
///
/// Decided once by the startup probe. A failed probe disables persistence
/// for the rest of the session; there is no re-probing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceStatus {
    /// Startup has not run yet.
    Unknown,
    Enabled,
    Disabled { reason: String },
}

impl PersistenceStatus {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(self, PersistenceStatus::Enabled)
    }

    /// Human-readable reason when disabled.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            PersistenceStatus::Disabled { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Coordinates the persisted-snapshot lifecycle: probe once, restore a fresh
/// slot at startup, gate every later write on the probe result, and wipe the
/// slot on reset.
///
/// The reducer and scoring stay pure; this service is the only place that
/// touches the store.
pub struct ProgressService {
    clock: Clock,
    store: Arc<dyn SnapshotStore>,
    status: RwLock<PersistenceStatus>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            clock,
            store,
            status: RwLock::new(PersistenceStatus::Unknown),
        }
    }

    /// Probe the store and, when it is usable, load any fresh snapshot.
    ///
    /// Returns the restored snapshot, or `None` when there is nothing to
    /// restore (empty slot, stale slot, unusable store). Calling this again
    /// after the status has been decided skips the probe and restores
    /// nothing.
    pub async fn startup(&self) -> Option<Snapshot> {
        if *self.status_lock() != PersistenceStatus::Unknown {
            return None;
        }

        match self.store.probe().await {
            StoreStatus::Available => {
                *self.status.write().expect("status lock poisoned") = PersistenceStatus::Enabled;
                self.store.load(self.clock.now()).await
            }
            StoreStatus::Unavailable { reason } => {
                *self.status.write().expect("status lock poisoned") =
                    PersistenceStatus::Disabled { reason };
                None
            }
        }
    }

    #[must_use]
    pub fn status(&self) -> PersistenceStatus {
        self.status_lock().clone()
    }

    /// Write the snapshot to the slot, stamped with the current time. A
    /// silent no-op while persistence is disabled.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the write fails.
    pub async fn save(&self, snapshot: &Snapshot) -> Result<(), ProgressError> {
        if !self.status_lock().is_enabled() {
            return Ok(());
        }
        self.store.save(snapshot, self.clock.now()).await?;
        Ok(())
    }

    /// Erase the stored slot (reset flow). A silent no-op while persistence
    /// is disabled.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the delete fails.
    pub async fn wipe(&self) -> Result<(), ProgressError> {
        if !self.status_lock().is_enabled() {
            return Ok(());
        }
        self.store.clear().await?;
        Ok(())
    }

    fn status_lock(&self) -> std::sync::RwLockReadGuard<'_, PersistenceStatus> {
        self.status.read().expect("status lock poisoned")
    }
}
