//! Error types used by the crate.

use thiserror::Error;

/// Map engine error type.
#[derive(Debug, Error)]
pub enum MapError {
    /// Network or transport failure.
    #[error("failed to load data: {0}")]
    Io(String),
    /// Tile server answered with a non-success status.
    #[error("tile server responded with status {0}")]
    HttpStatus(u16),
    /// Item not found (offline cache miss or no url for the layer).
    #[error("item not found")]
    NotFound,
    /// Bytes were loaded but could not be decoded into an image.
    #[error("failed to decode data")]
    Decoding,
    /// Image decoding error.
    #[cfg(feature = "image")]
    #[error("image decode error: {0:?}")]
    ImageDecode(#[from] image::ImageError),
    /// Error reading/writing data to the FS.
    #[error("file system error: {0}")]
    FsIo(String),
    /// Engine is configured incorrectly.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Operation requires a started map core.
    #[error("map core is not started")]
    NotStarted,
    /// A tile load panicked on a worker thread.
    #[error("tile loader panicked: {0}")]
    WorkerPanic(String),
    /// Generic error - details are inside.
    #[error("{0}")]
    Generic(String),
}

impl From<std::io::Error> for MapError {
    fn from(value: std::io::Error) -> Self {
        Self::FsIo(value.to_string())
    }
}

impl From<flysight_map_types::error::MapTypesError> for MapError {
    fn from(value: flysight_map_types::error::MapTypesError) -> Self {
        Self::Generic(value.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for MapError {
    fn from(value: reqwest::Error) -> Self {
        match value.status() {
            Some(status) => Self::HttpStatus(status.as_u16()),
            None => Self::Io(value.to_string()),
        }
    }
}
