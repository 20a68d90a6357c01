//! Previous / current / next song triple

use serde::{Deserialize, Serialize};

use super::{Playlist, PlaylistEntry, Status};

/// The songs around the play position, derived from a status and a queue
///
/// Each slot is absent when the status does not point at a song or the
/// position falls outside the queue. Equality is slot-wise: two absent
/// slots are equal, an absent and a present slot never are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentSong {
    pub previous: Option<PlaylistEntry>,
    pub current: Option<PlaylistEntry>,
    pub next: Option<PlaylistEntry>,
}

impl CurrentSong {
    /// Look up the triple for `status` in `playlist`
    ///
    /// Returns `None` when there is no queue snapshot yet. The previous
    /// slot is only filled alongside the current one.
    pub fn from_status(status: &Status, playlist: Option<&Playlist>) -> Option<Self> {
        let playlist = playlist?;
        let mut triple = CurrentSong::default();

        if status.has_current_song() {
            if let Some(current) = playlist.get(status.song) {
                if status.song > 0 {
                    triple.previous = playlist.get(status.song - 1).cloned();
                }
                triple.current = Some(current.clone());
            }
        }

        if status.has_next_song() {
            triple.next = playlist.get(status.next_song).cloned();
        }

        Some(triple)
    }

    /// True when all three slots are absent
    pub fn is_empty(&self) -> bool {
        self.previous.is_none() && self.current.is_none() && self.next.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(n: usize) -> Playlist {
        Playlist::new(
            (0..n)
                .map(|i| PlaylistEntry {
                    file: format!("song-{}.flac", i),
                    pos: i as u32,
                    id: 10 + i as u32,
                    ..Default::default()
                })
                .collect(),
        )
    }

    fn file(slot: &Option<PlaylistEntry>) -> Option<&str> {
        slot.as_ref().map(|e| e.file.as_str())
    }

    #[test]
    fn test_no_playlist_yields_none() {
        assert!(CurrentSong::from_status(&Status::default(), None).is_none());
    }

    #[test]
    fn test_middle_of_queue() {
        let status = Status {
            song: 2,
            song_id: 10,
            next_song: 3,
            next_song_id: 11,
            ..Default::default()
        };
        let queue = playlist(5);
        let triple = CurrentSong::from_status(&status, Some(&queue)).unwrap();

        assert_eq!(file(&triple.previous), Some("song-1.flac"));
        assert_eq!(file(&triple.current), Some("song-2.flac"));
        assert_eq!(file(&triple.next), Some("song-3.flac"));
    }

    #[test]
    fn test_first_song_has_no_previous() {
        let status = Status {
            song: 0,
            song_id: 10,
            next_song: 1,
            next_song_id: 11,
            ..Default::default()
        };
        let queue = playlist(3);
        let triple = CurrentSong::from_status(&status, Some(&queue)).unwrap();

        assert!(triple.previous.is_none());
        assert_eq!(file(&triple.current), Some("song-0.flac"));
        assert_eq!(file(&triple.next), Some("song-1.flac"));
    }

    #[test]
    fn test_no_song_ids_yields_empty_triple() {
        let status = Status {
            song: 1,
            next_song: 2,
            ..Default::default()
        };
        let queue = playlist(3);
        let triple = CurrentSong::from_status(&status, Some(&queue)).unwrap();
        assert!(triple.is_empty());
    }

    #[test]
    fn test_positions_past_end_are_absent() {
        let status = Status {
            song: 4,
            song_id: 10,
            next_song: 5,
            next_song_id: 11,
            ..Default::default()
        };
        let queue = playlist(3);
        let triple = CurrentSong::from_status(&status, Some(&queue)).unwrap();
        assert!(triple.is_empty());
    }

    #[test]
    fn test_slot_wise_equality() {
        let entry = PlaylistEntry {
            file: "a.flac".to_string(),
            ..Default::default()
        };
        let empty = CurrentSong::default();
        let with_current = CurrentSong {
            current: Some(entry.clone()),
            ..Default::default()
        };

        assert_eq!(empty, CurrentSong::default());
        assert_ne!(empty, with_current);
        assert_ne!(with_current, empty);
        assert_eq!(with_current, with_current.clone());
    }
}
