//! Error types for the cellwise facade

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by providers and sessions
#[derive(Debug, Error)]
pub enum Error {
    /// A caller passed an unusable argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Sheet loading or materialization failed
    #[error(transparent)]
    Sheet(#[from] cellwise_sheet::SheetError),

    /// Document loading or lookup failed
    #[error(transparent)]
    Json(#[from] cellwise_json::JsonError),
}

impl Error {
    /// Create an invalid-argument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }
}
