//! Reading and writing tag blocks with lofty.

use lofty::config::{ParseOptions, WriteOptions};
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::flac::FlacFile;
use lofty::ogg::VorbisComments;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, ItemValue, Tag, TagExt, TagItem, TagType};
use std::fs::{File, OpenOptions};
use std::io::Seek;
use std::path::Path;
use tracing::{debug, info};

use super::error::TagError;
use super::types::{id3v2_item_key, TagFormat, TagSet, MP3_ALLOWED_KEYS};

const ID3V24_VALUE_SEPARATOR: &str = "\0";

fn parse_options() -> ParseOptions {
    ParseOptions::new().read_properties(false)
}

/// Reads the Vorbis comments of a FLAC file.
///
/// Fails with [`TagError::Read`] if the file is not a valid FLAC stream. A
/// FLAC file without a comment block yields an empty set.
pub fn read_tags(path: &Path) -> Result<TagSet, TagError> {
    let mut file = File::open(path)?;
    let flac = FlacFile::read_from(&mut file, parse_options())
        .map_err(|e| TagError::read(path, e))?;

    let mut tags: TagSet = flac
        .vorbis_comments()
        .map(|comments| comments.items().collect())
        .unwrap_or_default();
    tags.merge_track_total();

    debug!("Tags for {}: {:?}", path.display(), tags);
    Ok(tags)
}

/// Writes tags to a converted file, replacing its existing tag block.
///
/// The set is filtered for the destination format first. Returns the number
/// of keys written.
pub fn write_tags(path: &Path, tags: &TagSet, format: TagFormat) -> Result<usize, TagError> {
    info!("Tagging file {} ...", path.display());
    let filtered = tags.filtered(format);

    match format {
        TagFormat::Id3v2 => write_id3v2(path, &filtered)?,
        TagFormat::VorbisComments => write_vorbis_comments(path, &filtered)?,
    }

    debug!("with tags {:?}", filtered);
    Ok(filtered.len())
}

/// Reads tags back from a converted file in the given format.
///
/// ID3v2 frames are mapped back onto the allow-listed keys.
pub fn read_tags_as(path: &Path, format: TagFormat) -> Result<TagSet, TagError> {
    match format {
        TagFormat::VorbisComments => read_tags(path),
        TagFormat::Id3v2 => read_id3v2(path),
    }
}

/// Copies the tags of `source` onto `destination`.
pub fn transfer_tags(
    source: &Path,
    destination: &Path,
    format: TagFormat,
) -> Result<usize, TagError> {
    let tags = read_tags(source)?;
    write_tags(destination, &tags, format)
}

fn write_id3v2(path: &Path, tags: &TagSet) -> Result<(), TagError> {
    let mut tag = Tag::new(TagType::Id3v2);

    for (key, values) in tags.iter() {
        let Some(item_key) = id3v2_item_key(key) else {
            continue;
        };

        if item_key == ItemKey::TrackNumber {
            // "3/12" style track numbers are split, ID3v2 joins them again in TRCK
            let Some(value) = values.first() else {
                continue;
            };
            match value.split_once('/') {
                Some((number, total)) => {
                    push_text(&mut tag, ItemKey::TrackNumber, number.trim());
                    push_text(&mut tag, ItemKey::TrackTotal, total.trim());
                }
                None => push_text(&mut tag, ItemKey::TrackNumber, value),
            }
            continue;
        }

        // One frame per key, ID3v2.4 separates multiple values with NUL
        push_text(&mut tag, item_key, &values.join(ID3V24_VALUE_SEPARATOR));
    }

    tag.save_to_path(path, WriteOptions::default())
        .map_err(|e| TagError::write(path, e))
}

fn push_text(tag: &mut Tag, key: ItemKey, value: &str) {
    if !tag.push(TagItem::new(key.clone(), ItemValue::Text(value.to_string()))) {
        debug!("Tag item {:?} rejected for ID3v2", key);
    }
}

fn read_id3v2(path: &Path) -> Result<TagSet, TagError> {
    let tagged_file = Probe::open(path)
        .map_err(|e| TagError::read(path, e))?
        .options(parse_options())
        .read()
        .map_err(|e| TagError::read(path, e))?;

    let mut tags = TagSet::new();
    let Some(tag) = tagged_file.tag(TagType::Id3v2) else {
        return Ok(tags);
    };

    for key in MP3_ALLOWED_KEYS {
        let Some(item_key) = id3v2_item_key(key) else {
            continue;
        };

        if item_key == ItemKey::TrackNumber {
            if let Some(number) = tag.get_string(&ItemKey::TrackNumber) {
                match tag.get_string(&ItemKey::TrackTotal) {
                    Some(total) => tags.push(key, format!("{}/{}", number, total)),
                    None => tags.push(key, number),
                }
            }
            continue;
        }

        for value in tag.get_strings(&item_key) {
            tags.push(key, value);
        }
    }

    Ok(tags)
}

fn write_vorbis_comments(path: &Path, tags: &TagSet) -> Result<(), TagError> {
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    let mut flac = FlacFile::read_from(&mut file, parse_options())
        .map_err(|e| TagError::read(path, e))?;

    let mut comments = VorbisComments::default();
    for (key, values) in tags.iter() {
        for value in values {
            comments.push(key.to_uppercase(), value.clone());
        }
    }

    flac.set_vorbis_comments(comments);
    file.rewind()?;
    flac.save_to(&mut file, WriteOptions::default())
        .map_err(|e| TagError::write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use tempfile::TempDir;

    fn source_tags() -> TagSet {
        [
            ("ALBUM", "Album"),
            ("ARTIST", "Artist"),
            ("COMPOSER", "Composer"),
            ("DATE", "2004"),
            ("GENRE", "Rock"),
            ("LYRICIST", "Lyricist"),
            ("TITLE", "Song"),
            ("TRACKNUMBER", "3"),
            ("VERSION", "Remastered"),
            ("COMMENT", "not for mp3"),
            ("ENCODER", "reference libFLAC"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_read_tags_from_flac() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("01.flac");
        std::fs::write(&path, fixtures::flac_bytes(&[("TITLE", "Song"), ("Artist", "Artist")]))
            .unwrap();

        let tags = read_tags(&path).unwrap();
        assert_eq!(tags.get("title"), Some("Song"));
        assert_eq!(tags.get("artist"), Some("Artist"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_read_tags_rejects_non_flac() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fake.flac");
        std::fs::write(&path, b"definitely not a flac stream").unwrap();

        let result = read_tags(&path);
        assert!(matches!(result, Err(TagError::Read { .. })));
    }

    #[test]
    fn test_read_tags_missing_file() {
        let result = read_tags(Path::new("/nonexistent/01.flac"));
        assert!(matches!(result, Err(TagError::Io(_))));
    }

    #[test]
    fn test_id3v2_round_trip_keeps_allow_list_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("01.mp3");
        std::fs::write(&path, fixtures::mp3_bytes()).unwrap();

        let written = write_tags(&path, &source_tags(), TagFormat::Id3v2).unwrap();
        assert_eq!(written, MP3_ALLOWED_KEYS.len());

        let read_back = read_tags_as(&path, TagFormat::Id3v2).unwrap();
        assert_eq!(read_back, source_tags().filtered(TagFormat::Id3v2));
        assert!(!read_back.contains_key("comment"));
        assert!(!read_back.contains_key("encoder"));
    }

    #[test]
    fn test_id3v2_track_total_survives() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("02.mp3");
        std::fs::write(&path, fixtures::mp3_bytes()).unwrap();

        let tags: TagSet = [("tracknumber", "2/12")].into_iter().collect();
        write_tags(&path, &tags, TagFormat::Id3v2).unwrap();

        let read_back = read_tags_as(&path, TagFormat::Id3v2).unwrap();
        assert_eq!(read_back.get("tracknumber"), Some("2/12"));
    }

    #[test]
    fn test_vorbis_round_trip_is_unfiltered() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("01.flac");
        std::fs::write(&path, fixtures::flac_bytes(&[("OLD", "value")])).unwrap();

        let written = write_tags(&path, &source_tags(), TagFormat::VorbisComments).unwrap();
        assert_eq!(written, source_tags().len());

        let read_back = read_tags(&path).unwrap();
        assert_eq!(read_back, source_tags());
        assert!(!read_back.contains_key("old"));
    }

    #[test]
    fn test_transfer_tags_to_mp3() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("01.flac");
        let destination = dir.path().join("01.mp3");
        std::fs::write(
            &source,
            fixtures::flac_bytes(&[("TITLE", "Song"), ("COMMENT", "dropped")]),
        )
        .unwrap();
        std::fs::write(&destination, fixtures::mp3_bytes()).unwrap();

        let written = transfer_tags(&source, &destination, TagFormat::Id3v2).unwrap();
        assert_eq!(written, 1);

        let read_back = read_tags_as(&destination, TagFormat::Id3v2).unwrap();
        assert_eq!(read_back.get("title"), Some("Song"));
        assert_eq!(read_back.len(), 1);
    }

    #[test]
    fn test_id3v2_multi_valued_keys_survive() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("03.mp3");
        std::fs::write(&path, fixtures::mp3_bytes()).unwrap();

        let tags: TagSet = [
            ("GENRE", "Rock"),
            ("GENRE", "Blues"),
            ("ARTIST", "First Artist"),
            ("ARTIST", "Second Artist"),
            ("TITLE", "Duet"),
        ]
        .into_iter()
        .collect();
        write_tags(&path, &tags, TagFormat::Id3v2).unwrap();

        let read_back = read_tags_as(&path, TagFormat::Id3v2).unwrap();
        assert_eq!(read_back.get_all("genre"), ["Rock", "Blues"]);
        assert_eq!(read_back.get_all("artist"), ["First Artist", "Second Artist"]);
        assert_eq!(read_back.get_all("title"), ["Duet"]);
    }

    #[test]
    fn test_vorbis_track_total_reaches_mp3() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("01.flac");
        let destination = dir.path().join("01.mp3");
        std::fs::write(&source, fixtures::flac_bytes(&[("TRACKNUMBER", "1/9")])).unwrap();
        std::fs::write(&destination, fixtures::mp3_bytes()).unwrap();

        assert_eq!(read_tags(&source).unwrap().get("tracknumber"), Some("1/9"));

        transfer_tags(&source, &destination, TagFormat::Id3v2).unwrap();
        let read_back = read_tags_as(&destination, TagFormat::Id3v2).unwrap();
        assert_eq!(read_back.get("tracknumber"), Some("1/9"));
    }

    #[test]
    fn test_vorbis_rewrite_keeps_stream_valid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("02.flac");
        std::fs::write(&path, fixtures::flac_bytes(&[("TITLE", "Before")])).unwrap();

        let tags: TagSet = [("TITLE", "After")].into_iter().collect();
        write_tags(&path, &tags, TagFormat::VorbisComments).unwrap();
        write_tags(&path, &tags, TagFormat::VorbisComments).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"fLaC");
        assert_eq!(read_tags(&path).unwrap().get_all("title"), ["After"]);
    }
}
