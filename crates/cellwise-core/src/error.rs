//! Error types for cellwise-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause attached to a wrapped fault
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur in cellwise-core
///
/// Only structural faults surface here. A value that merely cannot be
/// interpreted coerces to [`crate::CoercedValue::Absent`] instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying cell accessor failed to read a value
    #[error("{operation} failed at {context}: {source}")]
    Read {
        /// Operation that observed the fault
        operation: &'static str,
        /// Location of the fault (sheet/row/column or section/key)
        context: String,
        /// Originating cause
        #[source]
        source: BoxedCause,
    },

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap a low-level fault with the operation name and location
    pub fn read<C, E>(operation: &'static str, context: C, source: E) -> Self
    where
        C: Into<String>,
        E: Into<BoxedCause>,
    {
        Error::Read {
            operation,
            context: context.into(),
            source: source.into(),
        }
    }

    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
