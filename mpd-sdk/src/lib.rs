//! # MPD SDK - Reconnecting Client Layer for Music Player Daemon
//!
//! Keeps one live, self-healing connection per daemon address and a cached,
//! change-detected view of the player:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mpd_sdk::{ClientCache, ClientEvent, ClientOptions};
//!
//! let cache = ClientCache::new(Arc::new(my_dialer));
//! let client = cache
//!     .get_or_create("tcp", "localhost:6600", ClientOptions::blocking())
//!     .await?;
//!
//! // Cached snapshots, refreshed on every keepalive tick
//! if let Some(status) = client.status() {
//!     println!("volume = {}", status.volume);
//! }
//!
//! // Or react to changes as they are detected
//! let mut events = client.events();
//! while let Ok(event) = events.recv().await {
//!     if let ClientEvent::CurrentSongChanged(song) = event {
//!         println!("now playing: {:?}", song.current.as_ref().map(|s| s.display_title()));
//!     }
//! }
//!
//! cache.shutdown().await;
//! ```
//!
//! ## Key Features
//!
//! - **Client cache**: one client per `(network, address)`, created once even
//!   under concurrent lookups
//! - **Automatic reconnect**: a failing keepalive probe tears the connection
//!   down and redials at a constant interval until it works or the client is
//!   closed
//! - **Fail-fast commands**: `execute` returns `NotConnected` instead of
//!   waiting out an outage
//! - **Change detection**: status, queue and current-song snapshots are only
//!   published when they differ; the queue is only refetched when its
//!   version moves
//! - **Listeners and streams**: per-kind listener sets, each fed in order by
//!   its own worker task, plus a broadcast stream of `ClientEvent`
//!
//! ## Architecture
//!
//! ```text
//! ClientCache (one entry per address)
//!     ↓
//! ReconnectingClient (state machine, keepalive, execute gate)
//!     ↓                         ↓
//! mpd-state (SnapshotCache)   listener-set (per-event listeners)
//!     ↓
//! mpd-protocol (Dialer / Connection)
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod probe;
mod refresh;

// Main exports
pub use cache::{ClientCache, ClientCacheEntry};
pub use client::{ConnectionState, ReconnectingClient};
pub use config::ClientOptions;
pub use error::{ClientError, Result};
pub use events::{
    ClientEvent, ConnectedListener, CurrentSongChangedListener, DisconnectedListener, Listeners,
    PlaylistChangedListener, StatusChangedListener, SubsystemsChangedListener,
};
pub use probe::{KeepaliveProbe, PingProbe, ProbeContext, RefreshProbe};

// Re-export commonly used types from the lower crates
pub use listener_set::ListenerId;
pub use mpd_protocol::{Connection, Dialer, NetAddr, ProtocolError, Subsystem};
pub use mpd_state::{CurrentSong, OffOnOneshot, PlayerState, Playlist, PlaylistEntry, Status};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cache::ClientCache;
    pub use crate::client::{ConnectionState, ReconnectingClient};
    pub use crate::config::ClientOptions;
    pub use crate::error::{ClientError, Result};
    pub use crate::events::ClientEvent;
    pub use mpd_protocol::{Connection, NetAddr, Subsystem};
    pub use mpd_state::{CurrentSong, Playlist, Status};
}
