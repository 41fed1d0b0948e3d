use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use nobocon_core::Snapshot;

/// The single durable slot all progress is saved under.
pub const SLOT_KEY: &str = "nobocon-calc:v1";

/// Maximum age of a persisted snapshot before it is treated as absent.
pub const SNAPSHOT_TTL_MS: i64 = 12 * 60 * 60 * 1000;

/// The TTL as a `chrono::Duration`.
#[must_use]
pub fn snapshot_ttl() -> Duration {
    Duration::milliseconds(SNAPSHOT_TTL_MS)
}

/// Errors surfaced by storage adapters on writes. Reads never error; every
/// read fault degrades to "nothing stored".
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result of probing the durable store once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreStatus {
    Available,
    Unavailable { reason: String },
}

impl StoreStatus {
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, StoreStatus::Available)
    }

    /// Human-readable reason when unavailable.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            StoreStatus::Available => None,
            StoreStatus::Unavailable { reason } => Some(reason),
        }
    }
}

/// Gateway to the single-slot, expiring snapshot cache.
///
/// Implementations hold no live reference to the running snapshot; they only
/// ever serialize copies in and hand deserialized copies out.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Attempt a sentinel write+delete cycle. Any failure reports the store
    /// as unavailable with a human-readable reason. Leaves nothing behind.
    async fn probe(&self) -> StoreStatus;

    /// Read the slot. Returns `None` if the slot is empty, unparseable,
    /// missing its save timestamp, or older than the TTL relative to `now`.
    /// An expired slot is deleted before returning `None`.
    async fn load(&self, now: DateTime<Utc>) -> Option<Snapshot>;

    /// Stamp the snapshot with `now` and overwrite the slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the payload cannot be encoded or written.
    async fn save(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> Result<(), StorageError>;

    /// Delete the slot. Deleting an empty slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete cannot be executed.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Outcome of decoding a raw slot payload against the TTL.
pub(crate) enum Decoded {
    Fresh(Snapshot),
    Expired,
    Invalid,
}

/// Shared freshness check for all store implementations. A payload without a
/// `savedAt` stamp never came from a completed save, so it is invalid.
pub(crate) fn decode_payload(payload: &str, now: DateTime<Utc>) -> Decoded {
    let Ok(snapshot) = serde_json::from_str::<Snapshot>(payload) else {
        return Decoded::Invalid;
    };
    let Some(saved_at) = snapshot.saved_at else {
        return Decoded::Invalid;
    };
    if now.signed_duration_since(saved_at) > snapshot_ttl() {
        Decoded::Expired
    } else {
        Decoded::Fresh(snapshot)
    }
}
