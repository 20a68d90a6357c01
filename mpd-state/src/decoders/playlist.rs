//! `playlistinfo` record decoder

use mpd_protocol::Attrs;

use super::{float, int, leading_int};
use crate::model::{Playlist, PlaylistEntry};

impl PlaylistEntry {
    /// Decode one `playlistinfo` record; tag keys match case-insensitively
    pub fn from_attrs(attrs: &Attrs) -> Self {
        let mut entry = PlaylistEntry::default();

        for (key, value) in attrs.iter() {
            let text = value.to_string();
            match key.to_ascii_lowercase().as_str() {
                "file" => entry.file = text,
                "pos" => entry.pos = int(value),
                "id" => entry.id = int(value),
                "artist" => entry.artist = text,
                "artistsort" => entry.artist_sort = text,
                "album" => entry.album = text,
                "albumsort" => entry.album_sort = text,
                "albumartist" => entry.album_artist = text,
                "albumartistsort" => entry.album_artist_sort = text,
                "title" => entry.title = text,
                "titlesort" => entry.title_sort = text,
                "track" => entry.track = leading_int(value),
                "name" => entry.name = text,
                "genre" => entry.genre = text,
                "mood" => entry.mood = text,
                "date" => entry.date = text,
                "originaldate" => entry.original_date = text,
                "composer" => entry.composer = text,
                "composersort" => entry.composer_sort = text,
                "performer" => entry.performer = text,
                "conductor" => entry.conductor = text,
                "work" => entry.work = text,
                "ensemble" => entry.ensemble = text,
                "movement" => entry.movement = text,
                "movementnumber" => entry.movement_number = text,
                "location" => entry.location = text,
                "grouping" => entry.grouping = text,
                "comment" => entry.comment = text,
                "disc" => entry.disc = leading_int(value),
                "label" => entry.label = text,
                "musicbrainz_artistid" => entry.musicbrainz_artist_id = text,
                "musicbrainz_albumid" => entry.musicbrainz_album_id = text,
                "musicbrainz_albumartistid" => entry.musicbrainz_album_artist_id = text,
                "musicbrainz_trackid" => entry.musicbrainz_track_id = text,
                "musicbrainz_releasegroupid" => entry.musicbrainz_release_group_id = text,
                "musicbrainz_releasetrackid" => entry.musicbrainz_release_track_id = text,
                "musicbrainz_workid" => entry.musicbrainz_work_id = text,
                "duration" => entry.duration = float(value),
                "time" => entry.time = int(value),
                "range" => entry.range = text,
                "format" => entry.format = text,
                "last-modified" | "lastmodified" => entry.last_modified = text,
                "added" => entry.added = text,
                _ => {}
            }
        }

        entry
    }
}

impl Playlist {
    /// Decode a whole `playlistinfo` reply, one entry per record
    pub fn from_records(records: &[Attrs]) -> Self {
        Playlist::new(records.iter().map(PlaylistEntry::from_attrs).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_tagged_entry() {
        let attrs = Attrs::new()
            .with("file", "Miles Davis/Kind of Blue/01 So What.flac")
            .with("Last-Modified", "2021-03-04T10:00:00Z")
            .with("Format", "44100:16:2")
            .with("Artist", "Miles Davis")
            .with("AlbumArtist", "Miles Davis")
            .with("Title", "So What")
            .with("Album", "Kind of Blue")
            .with("Track", "1/5")
            .with("Disc", "1")
            .with("Date", "1959")
            .with("MUSICBRAINZ_TRACKID", "b1a9c0e9-d987-4042-ae91-78d6a3267d69")
            .with("Time", "562")
            .with("duration", "562.200")
            .with("Pos", "0")
            .with("Id", "10");
        let entry = PlaylistEntry::from_attrs(&attrs);

        assert_eq!(entry.file, "Miles Davis/Kind of Blue/01 So What.flac");
        assert_eq!(entry.last_modified, "2021-03-04T10:00:00Z");
        assert_eq!(entry.format, "44100:16:2");
        assert_eq!(entry.artist, "Miles Davis");
        assert_eq!(entry.album_artist, "Miles Davis");
        assert_eq!(entry.title, "So What");
        assert_eq!(entry.album, "Kind of Blue");
        assert_eq!(entry.track, 1);
        assert_eq!(entry.disc, 1);
        assert_eq!(entry.date, "1959");
        assert_eq!(
            entry.musicbrainz_track_id,
            "b1a9c0e9-d987-4042-ae91-78d6a3267d69"
        );
        assert_eq!(entry.time, 562);
        assert!((entry.duration - 562.2).abs() < 1e-3);
        assert_eq!((entry.pos, entry.id), (0, 10));
    }

    #[test]
    fn test_unknown_tags_ignored() {
        let attrs = Attrs::new()
            .with("file", "a.ogg")
            .with("X-Custom", "whatever")
            .with("Track", "B2");
        let entry = PlaylistEntry::from_attrs(&attrs);

        assert_eq!(entry.file, "a.ogg");
        assert_eq!(entry.track, 0);
    }

    #[test]
    fn test_from_records_keeps_order() {
        let records = vec![
            Attrs::new().with("file", "a.ogg").with("Pos", "0"),
            Attrs::new().with("file", "b.ogg").with("Pos", "1"),
        ];
        let playlist = Playlist::from_records(&records);

        let files: Vec<_> = playlist.iter().map(|e| e.file.as_str()).collect();
        assert_eq!(files, vec!["a.ogg", "b.ogg"]);
    }
}
