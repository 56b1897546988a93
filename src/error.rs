//! Error types for the word-cloud service

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while processing a render request
///
/// Validation failures (`MissingText`, `InvalidColor`) carry the exact
/// user-visible messages returned in the `{"error": ...}` response body.
/// Invalid mask names and oversized dimensions are deliberately *not*
/// represented here: the normalizer coerces the former to "no mask" and
/// clamps the latter, so neither ever reaches the caller as an error.
#[derive(Error, Debug)]
pub enum Error {
    /// Required `text` field absent from the request
    #[error("Missing required parameter Text")]
    MissingText,

    /// `background_color` rejected by the color predicate
    #[error("Incorrect value of background_color parameter")]
    InvalidColor,

    /// A recognized mask asset could not be loaded or decoded
    #[error("Mask asset unavailable: {0}")]
    Mask(String),

    /// The rendering delegate could not produce a raster
    #[error("Rendering failed: {0}")]
    Render(String),

    /// PNG serialization failed
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

impl Error {
    /// HTTP status code this error maps to at the transport boundary.
    ///
    /// Validation failures are the client's fault (400); everything past
    /// validation is a server-side failure (500).
    pub fn status(&self) -> u16 {
        match self {
            Error::MissingText | Error::InvalidColor => 400,
            Error::Mask(_) | Error::Render(_) | Error::Encode(_) => 500,
        }
    }
}
