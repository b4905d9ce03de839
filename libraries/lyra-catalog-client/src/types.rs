//! Types for catalog API requests and responses.

use lyra_core::{Playlist, PlaylistId, TrackId, TrackRef, UserId, UNKNOWN};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default overall request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for connecting to a catalog server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the server (e.g., "http://localhost:8080")
    pub url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl ClientConfig {
    /// Create a config with default timeouts.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// =============================================================================
// Track Types
// =============================================================================

/// A track as returned by the server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackDto {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub duration_ms: Option<i64>,
    #[serde(default)]
    pub size_bytes: Option<i64>,
}

impl From<TrackDto> for TrackRef {
    fn from(dto: TrackDto) -> Self {
        let duration = dto
            .duration_ms
            .and_then(|ms| u64::try_from(ms).ok())
            .map_or(Duration::ZERO, Duration::from_millis);

        let track = TrackRef::catalog(
            TrackId::new(dto.id),
            dto.title,
            dto.artist.unwrap_or_else(|| UNKNOWN.to_string()),
        )
        .with_duration(duration);

        match dto.album {
            Some(album) => track.with_album(album),
            None => track,
        }
    }
}

// =============================================================================
// Playlist Types
// =============================================================================

/// A playlist as returned by the server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub user_owner_id: Option<i64>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub tracks: Option<Vec<TrackDto>>,
}

impl From<PlaylistDto> for Playlist {
    fn from(dto: PlaylistDto) -> Self {
        Self {
            id: PlaylistId::new(dto.id),
            name: dto.name,
            owner_id: dto.user_owner_id.map(UserId::new),
            is_public: dto.is_public.unwrap_or(false),
            tracks: dto
                .tracks
                .unwrap_or_default()
                .into_iter()
                .map(TrackRef::from)
                .collect(),
        }
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Error body returned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub error: String,
}
