//! Queue snapshot

use serde::{Deserialize, Serialize};

/// Tags and metadata of one queue entry
///
/// Missing tags are empty strings, missing numbers are zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// Song URI relative to the music directory
    pub file: String,
    /// Position in the queue
    pub pos: u32,
    /// Song id, stable across queue moves
    pub id: u32,

    pub artist: String,
    pub artist_sort: String,
    pub album: String,
    pub album_sort: String,
    pub album_artist: String,
    pub album_artist_sort: String,
    pub title: String,
    pub title_sort: String,
    /// Track number within the album
    pub track: u32,
    /// Stream name, for radio streams
    pub name: String,
    pub genre: String,
    pub mood: String,
    pub date: String,
    pub original_date: String,
    pub composer: String,
    pub composer_sort: String,
    pub performer: String,
    pub conductor: String,
    /// A larger work (symphony, opera) the song belongs to
    pub work: String,
    pub ensemble: String,
    pub movement: String,
    pub movement_number: String,
    pub location: String,
    pub grouping: String,
    pub comment: String,
    /// Disc number within a multi-disc album
    pub disc: u32,
    pub label: String,

    pub musicbrainz_artist_id: String,
    pub musicbrainz_album_id: String,
    pub musicbrainz_album_artist_id: String,
    pub musicbrainz_track_id: String,
    pub musicbrainz_release_group_id: String,
    pub musicbrainz_release_track_id: String,
    pub musicbrainz_work_id: String,

    /// Duration in seconds, sub-second resolution
    pub duration: f32,
    /// Duration in whole seconds (legacy `time` key)
    pub time: u32,
    /// Portion of the file to play, `start-end` in seconds
    pub range: String,
    /// Audio format, `samplerate:bits:channels`
    pub format: String,
    pub last_modified: String,
    pub added: String,
}

impl PlaylistEntry {
    /// Title if tagged, otherwise the stream name, otherwise the file
    pub fn display_title(&self) -> &str {
        [&self.title, &self.name, &self.file]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Ordered copy of the whole queue
///
/// Replaced wholesale on every refetch, never patched in place. The queue
/// version that produced it is the `playlist` field of the status it was
/// fetched alongside.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub entries: Vec<PlaylistEntry>,
}

impl Playlist {
    pub fn new(entries: Vec<PlaylistEntry>) -> Self {
        Self { entries }
    }

    /// Entry at queue position `pos`
    pub fn get(&self, pos: u32) -> Option<&PlaylistEntry> {
        self.entries.get(pos as usize)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlaylistEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_title_fallbacks() {
        let mut entry = PlaylistEntry {
            file: "radio.m3u".to_string(),
            ..Default::default()
        };
        assert_eq!(entry.display_title(), "radio.m3u");

        entry.name = "Jazz FM".to_string();
        assert_eq!(entry.display_title(), "Jazz FM");

        entry.title = "So What".to_string();
        assert_eq!(entry.display_title(), "So What");
    }

    #[test]
    fn test_get_by_position() {
        let playlist = Playlist::new(vec![
            PlaylistEntry {
                file: "a.flac".to_string(),
                ..Default::default()
            },
            PlaylistEntry {
                file: "b.flac".to_string(),
                pos: 1,
                ..Default::default()
            },
        ]);

        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.get(1).map(|e| e.file.as_str()), Some("b.flac"));
        assert!(playlist.get(2).is_none());
    }
}
