#![forbid(unsafe_code)]

pub mod memory;
pub mod repository;
pub mod sqlite;

pub use memory::MemoryStore;
pub use repository::{
    SLOT_KEY, SNAPSHOT_TTL_MS, SnapshotStore, StorageError, StoreStatus, snapshot_ttl,
};
pub use sqlite::{SqliteInitError, SqliteStore};
