//! Snapshot refresh with change detection
//!
//! One refresh fetches the status, refetches the queue only when its version
//! moved, and publishes an event for each snapshot that actually changed:
//!
//! ```text
//! status ──> swap ──> version moved? ──> playlistinfo ──> swap ──> PlaylistChanged
//!              │
//!              └──> any field differs? ──> StatusChanged
//!                                            └──> triple differs? ──> CurrentSongChanged
//! ```
//!
//! The queue is swapped in before the current-song triple is derived, so the
//! triple always reflects the queue fetched alongside the status.

use std::sync::Arc;

use mpd_protocol::Connection;
use mpd_state::{Playlist, Status};
use tracing::debug;

use crate::client::ReconnectingClient;
use crate::error::Result;
use crate::events::ClientEvent;

impl ReconnectingClient {
    /// Refresh the snapshot cache over `connection` and publish what changed
    ///
    /// Used by the default keepalive probe and by `reload_status`. If the
    /// queue refetch fails the cached status is dropped so the next refresh
    /// retries the queue.
    pub(crate) async fn refresh_with(&self, connection: &dyn Connection) -> Result<()> {
        let snapshots = &self.inner.snapshots;

        let status = Status::from_attrs(&connection.status().await?);
        let update = snapshots.update_status(status);

        if update.needs_playlist() {
            let records = match connection.playlist_info(None).await {
                Ok(records) => records,
                Err(e) => {
                    snapshots.forget_status();
                    return Err(e.into());
                }
            };
            let playlist = snapshots.update_playlist(Playlist::from_records(&records));
            self.publish(ClientEvent::PlaylistChanged(playlist));
        }

        if update.is_changed() {
            self.publish(ClientEvent::StatusChanged(Arc::clone(&update.current)));

            if let Some(song) = snapshots.update_current_song(&update.current) {
                self.publish(ClientEvent::CurrentSongChanged(song));
            }
        } else {
            debug!(addr = %self.addr(), "status unchanged");
        }

        Ok(())
    }
}
