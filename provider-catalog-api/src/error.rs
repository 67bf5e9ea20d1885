//! Error types for the catalog API provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Catalog API errors
#[derive(Error, Debug)]
pub enum CatalogApiError {
    /// Server answered with a non-2xx status
    #[error("Catalog API error (status {status_code}) for {url}")]
    Status { status_code: u16, url: String },

    /// Server answered 2xx without a body
    #[error("Catalog API returned an empty body for {url}")]
    EmptyBody { url: String },

    /// Body was present but not the expected JSON shape
    #[error("Failed to parse catalog response from {url}: {message}")]
    ParseError { url: String, message: String },

    /// Transport failure reported by the HTTP bridge
    #[error(transparent)]
    BridgeError(#[from] BridgeError),
}

/// Result type for catalog API operations
pub type Result<T> = std::result::Result<T, CatalogApiError>;

impl From<CatalogApiError> for BridgeError {
    fn from(error: CatalogApiError) -> Self {
        match error {
            CatalogApiError::Status { status_code, url } => BridgeError::HttpStatus {
                status: status_code,
                url,
            },
            CatalogApiError::EmptyBody { url } => BridgeError::EmptyBody(url),
            CatalogApiError::ParseError { url, message } => {
                BridgeError::Decode(format!("{}: {}", url, message))
            }
            CatalogApiError::BridgeError(inner) => inner,
        }
    }
}
