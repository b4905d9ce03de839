//! Error types for the catalog client.

use lyra_core::LyraError;
use thiserror::Error;

/// Errors that can occur when talking to a catalog server.
#[derive(Error, Debug)]
pub enum CatalogClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    ///
    /// `message` is the `error` field of a JSON body when present, otherwise
    /// `Request failed: <status>`.
    #[error("{message}")]
    ServerError { status: u16, message: String },

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// File not found for upload
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// IO error while reading an upload
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

impl CatalogClientError {
    /// Status code of a server error response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<CatalogClientError> for LyraError {
    fn from(err: CatalogClientError) -> Self {
        match err {
            CatalogClientError::ServerError { message, .. } => Self::Catalog(message),
            CatalogClientError::ServerUnreachable(reason) => Self::Network(reason),
            CatalogClientError::InvalidUrl(reason) => Self::InvalidInput(reason),
            CatalogClientError::FileNotFound(path) => Self::not_found("File", path),
            CatalogClientError::Io(e) => Self::Io(e),
            other => Self::Catalog(other.to_string()),
        }
    }
}

/// Result type for catalog client operations.
pub type Result<T> = std::result::Result<T, CatalogClientError>;
