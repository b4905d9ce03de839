//! Domain types shared between the playback engine and the catalog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Placeholder used when the catalog has no artist or album for a track
pub const UNKNOWN: &str = "Unknown";

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw catalog identifier
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the raw identifier
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

numeric_id!(
    /// Catalog track identifier
    TrackId
);
numeric_id!(
    /// Catalog playlist identifier
    PlaylistId
);
numeric_id!(
    /// Catalog user identifier
    UserId
);

/// Where a track's audio comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TrackSource {
    /// Streamed from the catalog by id
    Catalog,

    /// A file on the local filesystem
    Local { path: PathBuf },
}

/// Identity used to find the same track in a rebuilt queue
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TrackKey {
    Catalog(TrackId),
    Local(PathBuf),
}

/// Reference to a playable unit
///
/// Immutable once built: the builder methods consume and return the value,
/// there are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRef {
    id: Option<TrackId>,
    title: String,
    artist: String,
    album: String,
    duration: Duration,
    source: TrackSource,
}

impl TrackRef {
    /// Create a reference to a catalog track
    pub fn catalog(id: TrackId, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            title: title.into(),
            artist: artist.into(),
            album: UNKNOWN.to_string(),
            duration: Duration::ZERO,
            source: TrackSource::Catalog,
        }
    }

    /// Create a reference to a local file
    ///
    /// The title is the file name; artist is left empty.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            id: None,
            title,
            artist: String::new(),
            album: UNKNOWN.to_string(),
            duration: Duration::ZERO,
            source: TrackSource::Local { path },
        }
    }

    /// Set the album; a blank name keeps the "Unknown" placeholder
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        let album = album.into();
        if !album.trim().is_empty() {
            self.album = album;
        }
        self
    }

    /// Set the duration hint
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn id(&self) -> Option<TrackId> {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn album(&self) -> &str {
        &self.album
    }

    /// Duration as reported by the catalog (zero when unknown)
    pub fn duration_hint(&self) -> Duration {
        self.duration
    }

    pub fn source(&self) -> &TrackSource {
        &self.source
    }

    /// Local filesystem path, for `local` tracks only
    pub fn local_path(&self) -> Option<&Path> {
        match &self.source {
            TrackSource::Local { path } => Some(path),
            TrackSource::Catalog => None,
        }
    }

    pub fn is_catalog(&self) -> bool {
        matches!(self.source, TrackSource::Catalog)
    }

    /// Identity key: catalog id, or path for local files
    pub fn key(&self) -> Option<TrackKey> {
        match (&self.source, self.id) {
            (TrackSource::Catalog, Some(id)) => Some(TrackKey::Catalog(id)),
            (TrackSource::Local { path }, _) => Some(TrackKey::Local(path.clone())),
            (TrackSource::Catalog, None) => None,
        }
    }
}

impl fmt::Display for TrackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.artist.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{} - {}", self.artist, self.title)
        }
    }
}

/// Playlist as returned by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name
    pub name: String,

    /// Owner user ID (if known)
    pub owner_id: Option<UserId>,

    /// Whether other users can see it
    pub is_public: bool,

    /// Tracks in playback order
    pub tracks: Vec<TrackRef>,
}

/// Payload for uploading a new track to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackUpload {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Audio file to upload
    pub file: PathBuf,
}

impl TrackUpload {
    pub fn new(file: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: UNKNOWN.to_string(),
            album: UNKNOWN.to_string(),
            file: file.into(),
        }
    }

    #[must_use]
    pub fn artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    #[must_use]
    pub fn album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }
}

/// Metadata edit for an existing catalog track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadataUpdate {
    pub title: String,
    pub artist: String,
    pub album: String,
}
