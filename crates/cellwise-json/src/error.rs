//! Document error types

use std::path::PathBuf;

use thiserror::Error;

use crate::schema::Violation;

/// Result type for document operations
pub type JsonResult<T> = std::result::Result<T, JsonError>;

/// Errors that can occur while loading or reading documents
#[derive(Debug, Error)]
pub enum JsonError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Document file could not be read
    #[error("Failed to load JSON file '{}': {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document text is not valid JSON
    #[error("Failed to parse JSON '{origin}': {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// Schema could not be read or compiled
    #[error("Failed to load JSON schema '{origin}': {reason}")]
    SchemaLoad { origin: String, reason: String },

    /// Document does not satisfy its schema
    #[error("JSON data does not match schema: {}", join_violations(.violations))]
    SchemaInvalid { violations: Vec<Violation> },

    /// A required value is absent or not convertible to the requested type
    #[error("Missing {kind} value for {location}")]
    MissingValue { kind: &'static str, location: String },

    /// A node could not be mapped onto the requested type
    #[error("Failed to deserialize {location}: {source}")]
    Deserialize {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] cellwise_core::Error),
}

impl JsonError {
    /// Create a missing-value error
    pub fn missing<L: Into<String>>(kind: &'static str, location: L) -> Self {
        JsonError::MissingValue {
            kind,
            location: location.into(),
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
