#![forbid(unsafe_code)]

pub mod debounce;
pub mod error;
pub mod progress;

pub use nobocon_core::Clock;
pub use storage::SNAPSHOT_TTL_MS;

pub use debounce::{SAVE_DEBOUNCE, SaveScheduler};
pub use error::ProgressError;
pub use progress::{PersistenceStatus, ProgressService};
