//! Track uploads to the catalog.

use crate::client::send;
use crate::error::{CatalogClientError, Result};
use lyra_core::TrackUpload;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;
use tracing::{debug, info};

/// Upload client for a catalog server.
pub struct UploadClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> UploadClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Upload one audio file with its title, artist and album.
    pub async fn upload_track(&self, upload: &TrackUpload) -> Result<()> {
        let path = upload.file.as_path();
        if !path.is_file() {
            return Err(CatalogClientError::FileNotFound(path.display().to_string()));
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("track")
            .to_string();

        debug!(file = %path.display(), "Uploading track");

        let contents = tokio::fs::read(path).await?;
        let file_size = contents.len();

        let file_part = Part::bytes(contents)
            .file_name(file_name.clone())
            .mime_str(mime_type_for_file(path))?;

        let form = Form::new()
            .text("title", upload.title.clone())
            .text("artist", upload.artist.clone())
            .text("album", upload.album.clone())
            .part("file", file_part);

        let url = format!("{}/api/tracks", self.base_url);
        send(self.http.post(&url).multipart(form)).await?;

        info!(
            file = %file_name,
            size = file_size,
            title = %upload.title,
            "Track uploaded"
        );
        Ok(())
    }
}

/// Get MIME type for audio file.
fn mime_type_for_file(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        Some("opus") => "audio/opus",
        Some("wav") => "audio/wav",
        Some("m4a" | "aac") => "audio/mp4",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_types() {
        assert_eq!(mime_type_for_file(Path::new("song.mp3")), "audio/mpeg");
        assert_eq!(mime_type_for_file(Path::new("song.FLAC")), "audio/flac");
        assert_eq!(mime_type_for_file(Path::new("song.ogg")), "audio/ogg");
        assert_eq!(mime_type_for_file(Path::new("song.m4a")), "audio/mp4");
        assert_eq!(
            mime_type_for_file(Path::new("song.unknown")),
            "application/octet-stream"
        );
        assert_eq!(
            mime_type_for_file(Path::new("no_extension")),
            "application/octet-stream"
        );
    }
}
