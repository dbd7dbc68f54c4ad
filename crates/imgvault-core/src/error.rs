//! Error types for the imgvault services.
//!
//! Errors are organized by the operation that raises them. The `Display`
//! strings of request-facing errors are the exact messages carried by the
//! response envelope, so handlers can forward `err.to_string()` unchanged.

use thiserror::Error;

use crate::format::ImageFormatKind;

/// Top-level error type for imgvault operations.
#[derive(Error, Debug)]
pub enum ImgvaultError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Asset store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Storage client setup errors
    #[error("Storage client error: {0}")]
    Client(#[from] FetchError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Rejections raised while accepting a new upload.
#[derive(Error, Debug)]
pub enum UploadError {
    /// Content type missing or not `image/<subtype>`
    #[error("Content type must contain an image format")]
    NotAnImage,

    /// Request body was empty
    #[error("Image not found")]
    EmptyBody,

    /// Request body exceeds the configured upload limit
    #[error("Image exceeds maximum upload size of {max_mb} MB")]
    TooLarge { max_mb: u64 },

    /// The document backend refused the insert
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures while reading an asset back from the store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No asset exists under the requested id
    #[error("Image not found")]
    NotFound,

    /// Requested conversion target is outside the whitelist
    #[error("Invalid image type: {requested}. Available types are: {}", ImageFormatKind::listing())]
    UnsupportedFormat { requested: String },

    /// Stored bytes could not be decoded or re-encoded
    #[error("Conversion error occurred")]
    Conversion,

    /// The document backend itself failed
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Soft failures of a single transform.
///
/// These never reach the client verbatim; services collapse them into a
/// transform-specific generic message and log the detail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// No decodable image behind the handle
    #[error("no decodable image")]
    NoImage,

    /// Requested dimensions are not positive or exceed the limit
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    /// Encoder rejected the image
    #[error("encode to {format} failed: {message}")]
    Encode { format: String, message: String },

    /// Codec work did not finish in time
    #[error("transform timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

/// Failures of the outbound fetch from a transform service to the store.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The store answered with `success: false`; message is forwarded verbatim
    #[error("{0}")]
    Rejected(String),

    /// Transport error, timeout, or an unreadable reply
    #[error("Failed to fetch image: {0}")]
    Unavailable(String),
}

/// Errors returned by the rotate/resize services.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Body did not parse as a JSON object
    #[error("Request body must be a JSON object")]
    InvalidBody,

    /// A mandatory parameter is absent
    #[error("Param '{0}' is mandatory")]
    MissingParam(&'static str),

    /// A parameter is present but not an integer
    #[error("Param '{0}' must be an integer")]
    InvalidParam(&'static str),

    /// The store could not provide the source asset
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The rotation produced no output
    #[error("Rotation error occurred")]
    Rotation,

    /// The resize produced no output
    #[error("Resizing error occurred")]
    Resizing,
}

/// Convenience type alias for imgvault results.
pub type Result<T> = std::result::Result<T, ImgvaultError>;

/// Convenience type alias for transform results.
pub type TransformResult = std::result::Result<Vec<u8>, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_messages() {
        assert_eq!(
            UploadError::NotAnImage.to_string(),
            "Content type must contain an image format"
        );
        assert_eq!(UploadError::EmptyBody.to_string(), "Image not found");
        assert_eq!(StoreError::NotFound.to_string(), "Image not found");
        assert_eq!(
            ServiceError::MissingParam("angle").to_string(),
            "Param 'angle' is mandatory"
        );
        assert_eq!(ServiceError::Rotation.to_string(), "Rotation error occurred");
        assert_eq!(ServiceError::Resizing.to_string(), "Resizing error occurred");
    }

    #[test]
    fn test_unsupported_format_lists_whitelist() {
        let err = StoreError::UnsupportedFormat {
            requested: "bmp".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid image type: bmp. Available types are: GIF, JPEG, PNG"
        );
    }

    #[test]
    fn test_rejected_fetch_is_verbatim() {
        let err = ServiceError::from(FetchError::Rejected("Image not found".into()));
        assert_eq!(err.to_string(), "Image not found");
    }
}
