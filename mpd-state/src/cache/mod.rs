//! Snapshot caching functionality

mod slot;
mod snapshot_cache;

pub use slot::Slot;
pub use snapshot_cache::{SnapshotCache, StatusUpdate};
