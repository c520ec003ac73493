//! Types for the tags module.

use lofty::tag::ItemKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::request::TargetFormat;

/// Keys allowed into MP3 outputs.
pub const MP3_ALLOWED_KEYS: [&str; 9] = [
    "album",
    "composer",
    "genre",
    "date",
    "lyricist",
    "title",
    "version",
    "artist",
    "tracknumber",
];

/// Tag block flavour of a destination container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagFormat {
    /// ID3v2 in an MPEG file, restricted to [`MP3_ALLOWED_KEYS`].
    Id3v2,
    /// Vorbis comments in a FLAC file, unfiltered.
    VorbisComments,
}

impl TagFormat {
    /// Returns the tag format written for a target.
    pub fn for_target(target: &TargetFormat) -> Self {
        if target.is_mp3() {
            Self::Id3v2
        } else {
            Self::VorbisComments
        }
    }

    /// Whether a key survives transfer into this format.
    pub fn allows(&self, key: &str) -> bool {
        match self {
            Self::Id3v2 => MP3_ALLOWED_KEYS.contains(&key),
            Self::VorbisComments => true,
        }
    }
}

/// Maps an allow-listed key onto the generic lofty item used for ID3v2.
pub(crate) fn id3v2_item_key(key: &str) -> Option<ItemKey> {
    let item_key = match key {
        "album" => ItemKey::AlbumTitle,
        "composer" => ItemKey::Composer,
        "genre" => ItemKey::Genre,
        "date" => ItemKey::RecordingDate,
        "lyricist" => ItemKey::Lyricist,
        "title" => ItemKey::TrackTitle,
        "version" => ItemKey::TrackSubtitle,
        "artist" => ItemKey::TrackArtist,
        "tracknumber" => ItemKey::TrackNumber,
        _ => return None,
    };
    Some(item_key)
}

/// Tags read from an audio file.
///
/// Keys are lowercase. A key may carry several values, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet {
    entries: BTreeMap<String, Vec<String>>,
}

impl TagSet {
    /// Creates an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value under a key. Keys are folded to lowercase.
    pub fn push(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .entry(key.as_ref().to_lowercase())
            .or_default()
            .push(value.into());
    }

    /// Returns the first value of a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns all values of a key.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries
            .get(&key.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_lowercase())
    }

    /// Iterates keys with all their values, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Iterates the keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes a key, returning its values.
    pub fn remove(&mut self, key: &str) -> Vec<String> {
        self.entries.remove(&key.to_lowercase()).unwrap_or_default()
    }

    /// Folds a separate `tracktotal` into `tracknumber` as `n/total`.
    ///
    /// FLAC readers split `TRACKNUMBER=3/12` into two comments, but only
    /// `tracknumber` is on the MP3 allow-list.
    pub fn merge_track_total(&mut self) {
        let (Some(number), Some(total)) = (self.get("tracknumber"), self.get("tracktotal"))
        else {
            return;
        };
        if number.contains('/') || self.get_all("tracknumber").len() > 1 {
            return;
        }
        let merged = format!("{}/{}", number, total);
        self.remove("tracktotal");
        self.entries.insert("tracknumber".to_string(), vec![merged]);
    }

    /// Returns the subset that survives transfer into the given format.
    pub fn filtered(&self, format: TagFormat) -> TagSet {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(key, _)| format.allows(key))
                .map(|(key, values)| (key.clone(), values.clone()))
                .collect(),
        }
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = TagSet::new();
        for (key, value) in iter {
            tags.push(key, value);
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tags() -> TagSet {
        [
            ("ARTIST", "Artist"),
            ("Album", "Album"),
            ("title", "Song"),
            ("TRACKNUMBER", "3"),
            ("COMMENT", "ripped with care"),
            ("REPLAYGAIN_TRACK_GAIN", "-6.5 dB"),
            ("GENRE", "Rock"),
            ("GENRE", "Blues"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_keys_are_lowercased() {
        let tags = sample_tags();
        assert_eq!(tags.get("artist"), Some("Artist"));
        assert_eq!(tags.get("ARTIST"), Some("Artist"));
        assert!(tags.contains_key("album"));
        assert!(tags.keys().all(|k| k == k.to_lowercase()));
    }

    #[test]
    fn test_multiple_values_keep_order() {
        let tags = sample_tags();
        assert_eq!(tags.get("genre"), Some("Rock"));
        assert_eq!(tags.get_all("genre"), ["Rock", "Blues"]);
        assert!(tags.get_all("missing").is_empty());
    }

    #[test]
    fn test_id3v2_filter_keeps_allow_list_only() {
        let filtered = sample_tags().filtered(TagFormat::Id3v2);
        let keys: Vec<&str> = filtered.keys().collect();
        assert_eq!(keys, ["album", "artist", "genre", "title", "tracknumber"]);
        assert!(!filtered.contains_key("comment"));
        assert!(!filtered.contains_key("replaygain_track_gain"));
    }

    #[test]
    fn test_vorbis_filter_keeps_everything() {
        let tags = sample_tags();
        assert_eq!(tags.filtered(TagFormat::VorbisComments), tags);
    }

    #[test]
    fn test_every_allowed_key_has_id3v2_mapping() {
        for key in MP3_ALLOWED_KEYS {
            assert!(id3v2_item_key(key).is_some(), "no mapping for {}", key);
        }
        assert!(id3v2_item_key("comment").is_none());
    }

    #[test]
    fn test_tag_format_for_target() {
        assert_eq!(TagFormat::for_target(&TargetFormat::Vbr0), TagFormat::Id3v2);
        assert_eq!(TagFormat::for_target(&TargetFormat::Cbr320), TagFormat::Id3v2);
        assert_eq!(
            TagFormat::for_target(&TargetFormat::FlacResample { sample_rate: 44100 }),
            TagFormat::VorbisComments
        );
    }

    #[test]
    fn test_merge_track_total() {
        let mut tags: TagSet = [("TRACKNUMBER", "1"), ("TRACKTOTAL", "9")]
            .into_iter()
            .collect();
        tags.merge_track_total();
        assert_eq!(tags.get("tracknumber"), Some("1/9"));
        assert!(!tags.contains_key("tracktotal"));
    }

    #[test]
    fn test_merge_track_total_keeps_existing_pair() {
        let mut tags: TagSet = [("TRACKNUMBER", "2/5"), ("TRACKTOTAL", "5")]
            .into_iter()
            .collect();
        tags.merge_track_total();
        assert_eq!(tags.get("tracknumber"), Some("2/5"));
        assert_eq!(tags.get("tracktotal"), Some("5"));

        let mut tags: TagSet = [("TRACKTOTAL", "5")].into_iter().collect();
        tags.merge_track_total();
        assert!(!tags.contains_key("tracknumber"));
        assert_eq!(tags.get("tracktotal"), Some("5"));
    }
}
