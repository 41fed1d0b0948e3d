mod action;
mod snapshot;

pub use action::{Action, reduce};
pub use snapshot::Snapshot;
