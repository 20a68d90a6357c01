//! Snapshot cache with change detection

use std::sync::Arc;
use tracing::debug;

use super::Slot;
use crate::model::{CurrentSong, Playlist, Status};

/// Result of swapping a new status into the cache
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    /// The status now in the cache
    pub current: Arc<Status>,
    /// The status it replaced, if there was one
    pub previous: Option<Arc<Status>>,
}

impl StatusUpdate {
    /// True when there was no previous status or any field differs
    pub fn is_changed(&self) -> bool {
        match &self.previous {
            None => true,
            Some(previous) => **previous != *self.current,
        }
    }

    /// True when there was no previous status or the queue version moved
    pub fn needs_playlist(&self) -> bool {
        match &self.previous {
            None => true,
            Some(previous) => previous.playlist_version_changed(&self.current),
        }
    }
}

/// The three cached snapshots of one client
///
/// Each slot is replaced wholesale. Update methods return what changed so
/// the caller can decide which events to publish.
#[derive(Default)]
pub struct SnapshotCache {
    status: Slot<Status>,
    playlist: Slot<Playlist>,
    current_song: Slot<CurrentSong>,
}

impl SnapshotCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Update methods with change detection ====================

    /// Swap in a new status, returning it together with the one it replaced
    pub fn update_status(&self, status: Status) -> StatusUpdate {
        let current = Arc::new(status);
        let previous = self.status.swap(Arc::clone(&current));
        debug!(
            playlist_version = current.playlist,
            first = previous.is_none(),
            "status swapped"
        );
        StatusUpdate { current, previous }
    }

    /// Swap in a new queue snapshot
    ///
    /// Always counts as a change: the caller only refetches the queue when
    /// its version moved.
    pub fn update_playlist(&self, playlist: Playlist) -> Arc<Playlist> {
        let playlist = Arc::new(playlist);
        self.playlist.swap(Arc::clone(&playlist));
        debug!(entries = playlist.len(), "playlist swapped");
        playlist
    }

    /// Recompute the current-song triple from `status` and the cached queue
    ///
    /// Returns the new triple if it differs from the cached one. Nothing is
    /// stored while there is no queue snapshot.
    pub fn update_current_song(&self, status: &Status) -> Option<Arc<CurrentSong>> {
        let playlist = self.playlist.load();
        let triple = Arc::new(CurrentSong::from_status(status, playlist.as_deref())?);
        let previous = self.current_song.swap(Arc::clone(&triple));

        let changed = match previous {
            None => true,
            Some(previous) => *previous != *triple,
        };
        if changed {
            debug!(empty = triple.is_empty(), "current song swapped");
            Some(triple)
        } else {
            None
        }
    }

    /// Drop the cached status so the next update counts as the first
    ///
    /// Used when a queue refetch fails after the status was swapped in, so
    /// the next refresh retries the queue instead of trusting its version.
    pub fn forget_status(&self) -> Option<Arc<Status>> {
        self.status.take()
    }

    // ==================== Query methods ====================

    pub fn status(&self) -> Option<Arc<Status>> {
        self.status.load()
    }

    pub fn playlist(&self) -> Option<Arc<Playlist>> {
        self.playlist.load()
    }

    pub fn current_song(&self) -> Option<Arc<CurrentSong>> {
        self.current_song.load()
    }

    /// Drop every snapshot
    pub fn clear(&self) {
        self.status.take();
        self.playlist.take();
        self.current_song.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PlayerState, PlaylistEntry};

    fn queue(files: &[&str]) -> Playlist {
        Playlist::new(
            files
                .iter()
                .map(|f| PlaylistEntry {
                    file: f.to_string(),
                    ..Default::default()
                })
                .collect(),
        )
    }

    #[test]
    fn test_first_status_is_a_change() {
        let cache = SnapshotCache::new();
        let update = cache.update_status(Status::default());

        assert!(update.previous.is_none());
        assert!(update.is_changed());
        assert!(update.needs_playlist());
    }

    #[test]
    fn test_same_status_is_not_a_change() {
        let cache = SnapshotCache::new();
        let status = Status {
            volume: 30,
            playlist: 4,
            ..Default::default()
        };
        cache.update_status(status.clone());

        let update = cache.update_status(status);
        assert!(!update.is_changed());
        assert!(!update.needs_playlist());
    }

    #[test]
    fn test_version_bump_needs_playlist() {
        let cache = SnapshotCache::new();
        cache.update_status(Status {
            playlist: 4,
            ..Default::default()
        });

        let update = cache.update_status(Status {
            playlist: 5,
            ..Default::default()
        });
        assert!(update.is_changed());
        assert!(update.needs_playlist());

        let update = cache.update_status(Status {
            playlist: 5,
            state: PlayerState::Play,
            ..Default::default()
        });
        assert!(update.is_changed());
        assert!(!update.needs_playlist());
    }

    #[test]
    fn test_current_song_needs_playlist() {
        let cache = SnapshotCache::new();
        let status = Status {
            song: 0,
            song_id: 1,
            ..Default::default()
        };

        assert!(cache.update_current_song(&status).is_none());
        assert!(cache.current_song().is_none());

        cache.update_playlist(queue(&["a.flac", "b.flac"]));
        let triple = cache.update_current_song(&status).unwrap();
        assert_eq!(triple.current.as_ref().unwrap().file, "a.flac");
    }

    #[test]
    fn test_current_song_change_detection() {
        let cache = SnapshotCache::new();
        cache.update_playlist(queue(&["a.flac", "b.flac"]));

        let first = Status {
            song: 0,
            song_id: 1,
            ..Default::default()
        };
        assert!(cache.update_current_song(&first).is_some());

        // Same position, different elapsed time: no change
        let same = Status {
            elapsed: 30.0,
            ..first.clone()
        };
        assert!(cache.update_current_song(&same).is_none());

        let moved = Status {
            song: 1,
            song_id: 2,
            ..Default::default()
        };
        let triple = cache.update_current_song(&moved).unwrap();
        assert_eq!(triple.previous.as_ref().unwrap().file, "a.flac");
        assert_eq!(triple.current.as_ref().unwrap().file, "b.flac");
    }

    #[test]
    fn test_forget_status_forces_refetch() {
        let cache = SnapshotCache::new();
        let status = Status {
            playlist: 9,
            ..Default::default()
        };
        cache.update_status(status.clone());

        assert!(cache.forget_status().is_some());
        let update = cache.update_status(status);
        assert!(update.needs_playlist());
        assert!(update.is_changed());
    }

    #[test]
    fn test_clear() {
        let cache = SnapshotCache::new();
        cache.update_status(Status::default());
        cache.update_playlist(queue(&["a.flac"]));

        cache.clear();
        assert!(cache.status().is_none());
        assert!(cache.playlist().is_none());
        assert!(cache.current_song().is_none());
    }
}
