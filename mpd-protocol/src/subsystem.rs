//! Server-side change categories reported by `idle`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named category of server state that `idle` can report as changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    /// The song database has been modified after update
    Database,
    /// A database update has started or finished
    Update,
    /// A stored playlist has been modified, renamed, created or deleted
    StoredPlaylist,
    /// The queue has been modified
    Playlist,
    /// The player has been started, stopped or seeked, or tags of the current song changed
    Player,
    /// The volume has been changed
    Mixer,
    /// An audio output has been added, removed or toggled
    Output,
    /// Options like repeat, random, crossfade or replay gain
    Options,
    /// A partition was added, removed or changed
    Partition,
    /// The sticker database has been modified
    Sticker,
    /// A client has subscribed or unsubscribed to a channel
    Subscription,
    /// A message was received on a subscribed channel
    Message,
    /// A neighbor was found or lost
    Neighbour,
    /// The mount list has changed
    Mount,
}

impl Subsystem {
    /// Every subsystem, in protocol documentation order
    pub const ALL: [Subsystem; 14] = [
        Subsystem::Database,
        Subsystem::Update,
        Subsystem::StoredPlaylist,
        Subsystem::Playlist,
        Subsystem::Player,
        Subsystem::Mixer,
        Subsystem::Output,
        Subsystem::Options,
        Subsystem::Partition,
        Subsystem::Sticker,
        Subsystem::Subscription,
        Subsystem::Message,
        Subsystem::Neighbour,
        Subsystem::Mount,
    ];

    /// Wire name of the subsystem
    pub fn as_str(&self) -> &'static str {
        match self {
            Subsystem::Database => "database",
            Subsystem::Update => "update",
            Subsystem::StoredPlaylist => "stored_playlist",
            Subsystem::Playlist => "playlist",
            Subsystem::Player => "player",
            Subsystem::Mixer => "mixer",
            Subsystem::Output => "output",
            Subsystem::Options => "options",
            Subsystem::Partition => "partition",
            Subsystem::Sticker => "sticker",
            Subsystem::Subscription => "subscription",
            Subsystem::Message => "message",
            Subsystem::Neighbour => "neighbour",
            Subsystem::Mount => "mount",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a subsystem name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown subsystem: {0}")]
pub struct UnknownSubsystem(pub String);

impl FromStr for Subsystem {
    type Err = UnknownSubsystem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subsystem::ALL
            .iter()
            .copied()
            .find(|subsystem| subsystem.as_str() == s)
            .ok_or_else(|| UnknownSubsystem(s.to_string()))
    }
}
