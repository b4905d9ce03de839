//! Lyra Core
//!
//! Platform-agnostic domain types, the catalog contract and error handling
//! shared by every Lyra crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TrackRef`, `Playlist`, upload and metadata payloads
//! - **Catalog Contract**: the `CatalogService` trait implemented by remote clients
//! - **Error Handling**: unified `LyraError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use lyra_core::{TrackId, TrackRef};
//! use std::time::Duration;
//!
//! let track = TrackRef::catalog(TrackId::new(7), "Blue in Green", "Miles Davis")
//!     .with_album("Kind of Blue")
//!     .with_duration(Duration::from_secs(337));
//!
//! assert_eq!(track.album(), "Kind of Blue");
//! assert!(track.is_catalog());
//! ```

#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod types;

pub use catalog::CatalogService;
pub use error::{LyraError, Result};
pub use types::{
    Playlist, PlaylistId, TrackId, TrackKey, TrackMetadataUpdate, TrackRef, TrackSource,
    TrackUpload, UserId, UNKNOWN,
};
