//! Schema validation
//!
//! Documents are checked once at load time. A validator returns every
//! violation it finds; an empty list means the document is valid.
//!
//! [`JsonSchema`] is a full JSON Schema draft-7 validator backed by the
//! `jsonschema` crate, with `format` assertions enabled. Schemas that do not
//! compile (a bad regex, a malformed keyword) fail to load.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use jsonschema::{Draft, Validator};
use serde_json::Value;

use crate::error::{JsonError, JsonResult};

/// One schema violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer to the offending node (empty for the document root)
    pub pointer: String,
    /// What is wrong
    pub message: String,
}

impl Violation {
    /// Create a violation
    pub fn new<P: Into<String>, M: Into<String>>(pointer: P, message: M) -> Self {
        Self {
            pointer: pointer.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pointer = if self.pointer.is_empty() { "/" } else { &self.pointer };
        write!(f, "{}: {}", pointer, self.message)
    }
}

/// Validates a whole document
pub trait SchemaValidator: Send + Sync + fmt::Debug {
    /// Return every violation found in `document`
    fn validate(&self, document: &Value) -> Vec<Violation>;
}

/// Compiled draft-7 schema
#[derive(Clone)]
pub struct JsonSchema {
    schema: Value,
    validator: Arc<Validator>,
}

impl JsonSchema {
    /// Compile a schema document
    pub fn from_value(schema: Value) -> JsonResult<Self> {
        Self::compile("<inline>", schema)
    }

    /// Read and compile a schema file
    pub fn from_file<P: AsRef<Path>>(path: P) -> JsonResult<Self> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| JsonError::SchemaLoad {
            origin: origin.clone(),
            reason: e.to_string(),
        })?;
        let schema = serde_json::from_str(&text).map_err(|e| JsonError::SchemaLoad {
            origin: origin.clone(),
            reason: e.to_string(),
        })?;
        Self::compile(&origin, schema)
    }

    /// The schema document
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    fn compile(origin: &str, schema: Value) -> JsonResult<Self> {
        let load_error = |reason: String| JsonError::SchemaLoad {
            origin: origin.to_string(),
            reason,
        };
        if !(schema.is_object() || schema.is_boolean()) {
            return Err(load_error("schema must be an object or a boolean".to_string()));
        }

        let validator = jsonschema::options()
            .with_draft(Draft::Draft7)
            .should_validate_formats(true)
            .build(&schema)
            .map_err(|e| load_error(e.to_string()))?;
        tracing::debug!("Compiled schema from {}", origin);

        Ok(Self {
            schema,
            validator: Arc::new(validator),
        })
    }
}

impl fmt::Debug for JsonSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchema").field("schema", &self.schema).finish_non_exhaustive()
    }
}

impl SchemaValidator for JsonSchema {
    fn validate(&self, document: &Value) -> Vec<Violation> {
        self.validator
            .iter_errors(document)
            .map(|error| Violation::new(error.instance_path.to_string(), error.to_string()))
            .collect()
    }
}
