//! `status` record decoder

use mpd_protocol::Attrs;

use super::{flag, float, int};
use crate::model::{OffOnOneshot, PlayerState, Status};

impl Status {
    /// Decode a `status` reply record
    pub fn from_attrs(attrs: &Attrs) -> Self {
        let mut status = Status::default();

        for (key, value) in attrs.iter() {
            match key.to_ascii_lowercase().as_str() {
                "partition" => status.partition = value.to_string(),
                "volume" => status.volume = int(value),
                "repeat" => status.repeat = flag(value),
                "random" => status.random = flag(value),
                "single" => status.single = OffOnOneshot::parse(value),
                "consume" => status.consume = OffOnOneshot::parse(value),
                "playlist" => status.playlist = int(value),
                "playlistlength" => status.playlist_length = int(value),
                "state" => status.state = PlayerState::parse(value),
                "song" => status.song = int(value),
                "songid" => status.song_id = int(value),
                "nextsong" => status.next_song = int(value),
                "nextsongid" => status.next_song_id = int(value),
                // "elapsed:total" on older servers, only the first half is kept
                "time" => status.time = int(value.split(':').next().unwrap_or(value)),
                "elapsed" => status.elapsed = float(value),
                "duration" => status.duration = float(value),
                "bitrate" => status.bitrate = int(value),
                "xfade" => status.crossfade = int(value),
                "mixrampdb" => status.mixramp_db = float(value),
                "mixrampdelay" => status.mixramp_delay = float(value),
                "audio" => status.audio = value.to_string(),
                "updating_db" => status.updating_db = value.to_string(),
                "error" => status.error = value.to_string(),
                _ => {}
            }
        }

        status
    }
}
