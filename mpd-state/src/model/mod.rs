//! Model types for mpd-state

mod current_song;
mod off_on_oneshot;
mod player_state;
mod playlist;
mod status;

pub use current_song::CurrentSong;
pub use off_on_oneshot::OffOnOneshot;
pub use player_state::PlayerState;
pub use playlist::{Playlist, PlaylistEntry};
pub use status::Status;
