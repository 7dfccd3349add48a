//! Known tag keys and how each one is stored in an ID3v2 tag

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TagError;

/// Marker that identifies vendor-namespaced keys
pub const VENDOR_MARKER: &str = "musicbrainz";

/// Where a key lives inside an ID3v2 tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSlot {
    /// Plain text frame (`T***`)
    Text(&'static str),
    /// User-defined text frame (`TXXX`) with the given description
    UserText(&'static str),
    /// URL link frame (`W***`)
    Link(&'static str),
}

/// Value constraints enforced before a value is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Anything goes
    Free,
    /// `N` or `N/M`
    NumberPair,
    /// Unsigned integer
    Number,
    /// `0` or `1`
    Flag,
}

macro_rules! tag_keys {
    ($($variant:ident => $name:literal, $slot:expr, $kind:expr;)+) => {
        /// Closed set of tag keys understood by the library
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(into = "String", try_from = "String")]
        pub enum TagKey {
            $($variant,)+
        }

        impl TagKey {
            /// Every known key, in display order
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Canonical lowercase name
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            /// Storage location in an ID3v2 tag
            #[must_use]
            pub const fn slot(self) -> FrameSlot {
                match self {
                    $(Self::$variant => $slot,)+
                }
            }

            /// Constraint applied by [`TagKey::validate`]
            #[must_use]
            pub const fn kind(self) -> ValueKind {
                match self {
                    $(Self::$variant => $kind,)+
                }
            }
        }
    };
}

use FrameSlot::{Link, Text, UserText};
use ValueKind::{Flag, Free, Number, NumberPair};

tag_keys! {
    Title => "title", Text("TIT2"), Free;
    Artist => "artist", Text("TPE1"), Free;
    TrackNumber => "tracknumber", Text("TRCK"), NumberPair;
    Album => "album", Text("TALB"), Free;
    Genre => "genre", Text("TCON"), Free;
    AlbumArtist => "albumartist", Text("TPE2"), Free;
    Composer => "composer", Text("TCOM"), Free;
    Date => "date", Text("TDRC"), Free;
    OriginalDate => "originaldate", Text("TDOR"), Free;
    DiscNumber => "discnumber", Text("TPOS"), NumberPair;
    DiscSubtitle => "discsubtitle", Text("TSST"), Free;
    Bpm => "bpm", Text("TBPM"), Number;
    Compilation => "compilation", Text("TCMP"), Flag;
    Copyright => "copyright", Text("TCOP"), Free;
    EncodedBy => "encodedby", Text("TENC"), Free;
    Lyricist => "lyricist", Text("TEXT"), Free;
    Length => "length", Text("TLEN"), Number;
    Media => "media", Text("TMED"), Free;
    Mood => "mood", Text("TMOO"), Free;
    Grouping => "grouping", Text("TIT1"), Free;
    Version => "version", Text("TIT3"), Free;
    Conductor => "conductor", Text("TPE3"), Free;
    Arranger => "arranger", Text("TPE4"), Free;
    Organization => "organization", Text("TPUB"), Free;
    Author => "author", Text("TOLY"), Free;
    Language => "language", Text("TLAN"), Free;
    Isrc => "isrc", Text("TSRC"), Free;
    AlbumArtistSort => "albumartistsort", Text("TSO2"), Free;
    AlbumSort => "albumsort", Text("TSOA"), Free;
    ComposerSort => "composersort", Text("TSOC"), Free;
    ArtistSort => "artistsort", Text("TSOP"), Free;
    TitleSort => "titlesort", Text("TSOT"), Free;
    Website => "website", Link("WOAR"), Free;
    Asin => "asin", UserText("ASIN"), Free;
    Barcode => "barcode", UserText("BARCODE"), Free;
    CatalogNumber => "catalognumber", UserText("CATALOGNUMBER"), Free;
    ReleaseCountry => "releasecountry", UserText("MusicBrainz Album Release Country"), Free;
    AcoustidId => "acoustid_id", UserText("Acoustid Id"), Free;
    AcoustidFingerprint => "acoustid_fingerprint", UserText("Acoustid Fingerprint"), Free;
    MusicipPuid => "musicip_puid", UserText("MusicIP PUID"), Free;
    MusicipFingerprint => "musicip_fingerprint", UserText("MusicMagic Fingerprint"), Free;
    MusicBrainzArtistId => "musicbrainz_artistid", UserText("MusicBrainz Artist Id"), Free;
    MusicBrainzAlbumId => "musicbrainz_albumid", UserText("MusicBrainz Album Id"), Free;
    MusicBrainzAlbumArtistId => "musicbrainz_albumartistid", UserText("MusicBrainz Album Artist Id"), Free;
    MusicBrainzReleaseGroupId => "musicbrainz_releasegroupid", UserText("MusicBrainz Release Group Id"), Free;
    MusicBrainzAlbumStatus => "musicbrainz_albumstatus", UserText("MusicBrainz Album Status"), Free;
    MusicBrainzAlbumType => "musicbrainz_albumtype", UserText("MusicBrainz Album Type"), Free;
}

impl TagKey {
    /// Keys shown first when a track is displayed
    pub const MAIN: &'static [Self] = &[
        Self::Title,
        Self::Artist,
        Self::TrackNumber,
        Self::Album,
        Self::Genre,
    ];

    /// Keys outside [`TagKey::MAIN`] that are not vendor-namespaced
    pub fn extended() -> impl Iterator<Item = Self> {
        Self::ALL
            .iter()
            .copied()
            .filter(|key| !Self::MAIN.contains(key) && !key.is_vendor())
    }

    /// Look a key up by its canonical name (case-insensitive)
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.name().eq_ignore_ascii_case(name))
    }

    /// Find the key stored in the `TXXX` frame with this description
    #[must_use]
    pub fn from_user_text(description: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| {
            matches!(key.slot(), FrameSlot::UserText(d) if d.eq_ignore_ascii_case(description))
        })
    }

    /// Sort variants ignore a leading definite article when rewritten in bulk
    #[must_use]
    pub fn is_sort_variant(self) -> bool {
        self.name().ends_with("sort")
    }

    /// Vendor-namespaced keys are left out of extended field listings
    #[must_use]
    pub fn is_vendor(self) -> bool {
        self.name().contains(VENDOR_MARKER)
    }

    /// Check a value against this key's constraint.
    ///
    /// # Errors
    /// Returns `TagError::InvalidValue` when the value does not fit.
    pub fn validate(self, value: &str) -> Result<(), TagError> {
        let ok = match self.kind() {
            ValueKind::Free => true,
            ValueKind::Number => super::util::parse_u32(value).is_some(),
            ValueKind::NumberPair => super::util::parse_slash_pair_u32(value).is_some(),
            ValueKind::Flag => super::util::parse_flag(value).is_some(),
        };
        if ok {
            Ok(())
        } else {
            Err(TagError::InvalidValue {
                key: self,
                value: value.to_string(),
                expected: self.kind().describe(),
            })
        }
    }
}

impl ValueKind {
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Free => "any text",
            Self::NumberPair => "a number or number/total",
            Self::Number => "a whole number",
            Self::Flag => "0 or 1",
        }
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TagKey {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| TagError::UnknownKey(s.to_string()))
    }
}

impl From<TagKey> for String {
    fn from(key: TagKey) -> Self {
        key.name().to_string()
    }
}

impl TryFrom<String> for TagKey {
    type Error = TagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Named groups of keys rewritten together
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TagGroup {
    /// `artist` and `artistsort`
    Artist,
    /// `album` and `albumsort`
    Album,
    /// `albumartist` and `albumartistsort`
    AlbumArtist,
}

impl TagGroup {
    #[must_use]
    pub const fn keys(self) -> &'static [TagKey] {
        match self {
            Self::Artist => &[TagKey::Artist, TagKey::ArtistSort],
            Self::Album => &[TagKey::Album, TagKey::AlbumSort],
            Self::AlbumArtist => &[TagKey::AlbumArtist, TagKey::AlbumArtistSort],
        }
    }
}
