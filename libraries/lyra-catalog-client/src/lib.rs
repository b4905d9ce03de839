//! Lyra Catalog Client
//!
//! HTTP client for the Lyra catalog API.
//!
//! # Features
//!
//! - **Tracks**: list, search, edit metadata, delete
//! - **Playlists**: list by owner, fetch, create, rename, reorder, add/remove tracks
//! - **Upload**: multipart upload of audio files
//! - **Streaming**: stream URLs for media backends
//!
//! `CatalogClient` implements [`lyra_core::CatalogService`], so it can be
//! attached to a player facade directly.
//!
//! # Example
//!
//! ```no_run
//! use lyra_catalog_client::{CatalogClient, ClientConfig};
//! use lyra_core::{CatalogService, PlaylistId};
//!
//! # async fn run() -> lyra_core::Result<()> {
//! let client = CatalogClient::new(ClientConfig::new("http://localhost:8080"))?;
//!
//! let playlist = client.get_playlist(PlaylistId::new(3)).await?;
//! println!("{} ({} tracks)", playlist.name, playlist.tracks.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod library;
mod playlists;
mod service;
mod types;
mod upload;

pub use client::CatalogClient;
pub use error::{CatalogClientError, Result};
pub use types::{ApiError, ClientConfig, PlaylistDto, TrackDto};

pub use library::LibraryClient;
pub use playlists::PlaylistClient;
pub use upload::UploadClient;
