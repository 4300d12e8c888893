//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error, PartialEq)]
pub enum MapTypesError {
    /// Zoom level the projection cannot represent.
    #[error("zoom level {0} is not supported")]
    InvalidZoom(u32),
}
