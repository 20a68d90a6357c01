//! Player state enumeration

use serde::{Deserialize, Serialize};

/// Current player state as reported by `status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayerState {
    /// Currently playing
    Play,
    /// Playback is paused
    Pause,
    /// Playback is stopped
    Stop,
    /// No `state` key, or a value this library does not know
    #[default]
    Unknown,
}

impl PlayerState {
    /// Parse the `state` value of a status record
    ///
    /// Handles "play", "pause" and "stop" case-insensitively; anything else
    /// maps to `Unknown`.
    pub fn parse(state: &str) -> Self {
        match state.to_ascii_lowercase().as_str() {
            "play" => PlayerState::Play,
            "pause" => PlayerState::Pause,
            "stop" => PlayerState::Stop,
            _ => PlayerState::Unknown,
        }
    }

    /// Wire value, empty for `Unknown`
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerState::Play => "play",
            PlayerState::Pause => "pause",
            PlayerState::Stop => "stop",
            PlayerState::Unknown => "",
        }
    }

    pub fn is_playing(&self) -> bool {
        *self == PlayerState::Play
    }
}
