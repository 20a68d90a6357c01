//! MPD State Snapshots
//!
//! Immutable point-in-time copies of what the daemon reports, decoded from
//! protocol records, plus the swap cache the reconnecting client keeps them in.
//!
//! # Features
//!
//! - **Snapshot Types**: `Status`, `Playlist`, `CurrentSong` with field-wise equality
//! - **Tolerant Decoding**: unknown keys skipped, malformed numbers left at zero
//! - **Swap Cache**: `SnapshotCache` replaces values wholesale and reports what changed
//!
//! # Quick Start
//!
//! ```rust
//! use mpd_protocol::Attrs;
//! use mpd_state::{PlayerState, SnapshotCache, Status};
//!
//! let attrs = Attrs::new().with("state", "play").with("playlist", "3");
//! let cache = SnapshotCache::new();
//!
//! let update = cache.update_status(Status::from_attrs(&attrs));
//! assert!(update.is_changed());
//! assert!(update.needs_playlist());
//! assert_eq!(cache.status().unwrap().state, PlayerState::Play);
//! ```
//!
//! # Architecture
//!
//! ```text
//! Attrs ──decoders──> Status / Playlist
//!                         │
//!                         └──> SnapshotCache
//!                                ├── status: Slot<Status>
//!                                ├── playlist: Slot<Playlist>
//!                                └── current_song: Slot<CurrentSong>
//! ```

pub mod cache;
pub mod decoders;
pub mod model;

pub use cache::{SnapshotCache, Slot, StatusUpdate};
pub use model::{CurrentSong, OffOnOneshot, PlayerState, Playlist, PlaylistEntry, Status};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cache::SnapshotCache;
    pub use crate::model::{CurrentSong, PlayerState, Playlist, PlaylistEntry, Status};
}
