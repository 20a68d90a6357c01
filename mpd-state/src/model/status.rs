//! Player status snapshot

use serde::{Deserialize, Serialize};

use super::{OffOnOneshot, PlayerState};

/// Point-in-time copy of the `status` record
///
/// Two snapshots are equal exactly when every field is equal; this is what
/// the refresher uses to decide whether a "status changed" event fires.
/// Numeric fields the server omitted or sent malformed are left at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    /// Name of the current partition
    pub partition: String,

    /// 0-100, or -1 if the volume cannot be determined
    pub volume: i32,

    pub repeat: bool,

    pub random: bool,

    pub single: OffOnOneshot,

    pub consume: OffOnOneshot,

    /// Queue version, bumped by the server on every queue mutation
    pub playlist: u32,

    /// Number of entries in the queue
    pub playlist_length: u32,

    pub state: PlayerState,

    /// Queue position of the current song
    pub song: u32,

    /// Song id of the current song, 0 when there is none
    pub song_id: u32,

    /// Queue position of the next song
    pub next_song: u32,

    /// Song id of the next song, 0 when there is none
    pub next_song_id: u32,

    /// Whole seconds elapsed in the current song (legacy `time` key)
    pub time: u32,

    /// Seconds elapsed in the current song, sub-second resolution
    pub elapsed: f32,

    /// Duration of the current song in seconds
    pub duration: f32,

    /// Instantaneous bitrate in kbps
    pub bitrate: u32,

    /// Crossfade in seconds (`xfade`)
    pub crossfade: u32,

    /// Mixramp threshold in dB
    pub mixramp_db: f32,

    /// Mixramp delay in seconds
    pub mixramp_delay: f32,

    /// Decoder output format, `samplerate:bits:channels`
    pub audio: String,

    /// Job id of a running database update
    pub updating_db: String,

    /// Error message, if the server reports one
    pub error: String,
}

impl Status {
    /// Whether the status points at a current song
    pub fn has_current_song(&self) -> bool {
        self.song_id > 0
    }

    /// Whether the status points at a next song
    pub fn has_next_song(&self) -> bool {
        self.next_song_id > 0
    }

    /// Whether the queue version differs from `other`'s
    pub fn playlist_version_changed(&self, other: &Status) -> bool {
        self.playlist != other.playlist
    }
}
