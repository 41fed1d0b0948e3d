use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use nobocon_core::Snapshot;

use crate::repository::{
    Decoded, SLOT_KEY, SnapshotStore, StorageError, StoreStatus, decode_payload,
};

/// In-memory store with the same slot semantics as the SQLite adapter. Used
/// by tests and wherever the app must keep running without durable storage.
#[derive(Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
    probe_failure: Option<String>,
    writes: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose probe always fails with the given reason. The slot
    /// operations still work, mirroring a store that breaks only at probe
    /// time.
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            probe_failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Raw payload currently in the slot, for test inspection.
    #[must_use]
    pub fn raw_payload(&self) -> Option<String> {
        self.slots
            .lock()
            .expect("slot lock poisoned")
            .get(SLOT_KEY)
            .cloned()
    }

    /// Put an arbitrary payload in the slot, bypassing serialization.
    pub fn inject_payload(&self, payload: impl Into<String>) {
        self.slots
            .lock()
            .expect("slot lock poisoned")
            .insert(SLOT_KEY.to_string(), payload.into());
    }

    /// Number of completed saves, for asserting debounce behavior.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn probe(&self) -> StoreStatus {
        match &self.probe_failure {
            None => StoreStatus::Available,
            Some(reason) => StoreStatus::Unavailable {
                reason: reason.clone(),
            },
        }
    }

    async fn load(&self, now: DateTime<Utc>) -> Option<Snapshot> {
        let payload = self
            .slots
            .lock()
            .expect("slot lock poisoned")
            .get(SLOT_KEY)
            .cloned()?;
        match decode_payload(&payload, now) {
            Decoded::Fresh(snapshot) => Some(snapshot),
            Decoded::Expired => {
                self.slots
                    .lock()
                    .expect("slot lock poisoned")
                    .remove(SLOT_KEY);
                None
            }
            Decoded::Invalid => None,
        }
    }

    async fn save(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> Result<(), StorageError> {
        let payload = serde_json::to_string(&snapshot.stamped(now))
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.slots
            .lock()
            .expect("slot lock poisoned")
            .insert(SLOT_KEY.to_string(), payload);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.slots
            .lock()
            .expect("slot lock poisoned")
            .remove(SLOT_KEY);
        Ok(())
    }
}
