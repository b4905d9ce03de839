//! Main catalog client.

use crate::error::{CatalogClientError, Result};
use crate::library::LibraryClient;
use crate::playlists::PlaylistClient;
use crate::types::{ApiError, ClientConfig};
use crate::upload::UploadClient;
use lyra_core::TrackId;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

/// Client for a Lyra catalog server.
///
/// Holds one connection pool; the track, playlist and upload operations are
/// reached through short-lived sub-clients borrowing it.
///
/// # Example
///
/// ```no_run
/// use lyra_catalog_client::{CatalogClient, ClientConfig};
///
/// # async fn run() -> lyra_catalog_client::Result<()> {
/// let client = CatalogClient::new(ClientConfig::new("http://localhost:8080"))?;
/// let tracks = client.library().list_tracks().await?;
/// println!("Found {} tracks", tracks.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(CatalogClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.url.trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CatalogClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        Url::parse(&base_url).map_err(|e| CatalogClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("Lyra/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        debug!(url = %base_url, "Catalog client created");
        Ok(Self { http, base_url })
    }

    /// Server base URL, without a trailing slash.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// URL a media backend can stream a catalog track from.
    pub fn stream_url(&self, track_id: TrackId) -> String {
        format!("{}/api/tracks/{}/stream", self.base_url, track_id)
    }

    /// Track operations.
    pub fn library(&self) -> LibraryClient<'_> {
        LibraryClient::new(&self.http, &self.base_url)
    }

    /// Playlist operations.
    pub fn playlists(&self) -> PlaylistClient<'_> {
        PlaylistClient::new(&self.http, &self.base_url)
    }

    /// Track uploads.
    pub fn uploads(&self) -> UploadClient<'_> {
        UploadClient::new(&self.http, &self.base_url)
    }
}

/// Send a request and turn failures into client errors.
///
/// Connection failures and timeouts become `ServerUnreachable`. A
/// non-success status becomes `ServerError` carrying the `error` field of a
/// JSON body, or `Request failed: <status>` when there is none.
pub(crate) async fn send(request: RequestBuilder) -> Result<Response> {
    let response = request.send().await.map_err(|e| {
        if e.is_connect() || e.is_timeout() {
            CatalogClientError::ServerUnreachable(e.to_string())
        } else {
            CatalogClientError::Request(e)
        }
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiError>(&body)
        .map(|api| api.error)
        .unwrap_or_else(|_| format!("Request failed: {}", status.as_u16()));

    warn!(status = status.as_u16(), message = %message, "Catalog request failed");
    Err(CatalogClientError::ServerError {
        status: status.as_u16(),
        message,
    })
}

/// Send a request and decode its JSON body.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    what: &str,
) -> Result<T> {
    send(request)
        .await?
        .json()
        .await
        .map_err(|e| CatalogClientError::ParseError(format!("Failed to parse {what}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        assert!(CatalogClient::new(ClientConfig::new("https://example.com")).is_ok());
        assert!(CatalogClient::new(ClientConfig::new("http://localhost:8080")).is_ok());

        assert!(CatalogClient::new(ClientConfig::new("")).is_err());
        assert!(CatalogClient::new(ClientConfig::new("not-a-url")).is_err());
        assert!(CatalogClient::new(ClientConfig::new("ftp://example.com")).is_err());
    }

    #[test]
    fn test_url_normalization() {
        let client = CatalogClient::new(ClientConfig::new("https://example.com///")).unwrap();
        assert_eq!(client.url(), "https://example.com");
    }

    #[test]
    fn test_stream_url() {
        let client = CatalogClient::new(ClientConfig::new("http://localhost:8080/")).unwrap();
        assert_eq!(
            client.stream_url(TrackId::new(42)),
            "http://localhost:8080/api/tracks/42/stream"
        );
    }
}
