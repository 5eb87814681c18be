//! Document store configuration

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{JsonError, JsonResult};
use crate::schema::SchemaValidator;
use crate::store::DocumentStore;

/// Configuration for loading a [`DocumentStore`]
///
/// This is the complete set of recognized options; a configuration file with
/// any other key is rejected.
///
/// ```json
/// {
///   "file_path": "data/bookings.json",
///   "schema_path": "data/bookings.schema.json",
///   "default_section": "Booking",
///   "cache_enabled": true
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentConfig {
    /// Document file (required)
    pub file_path: PathBuf,
    /// Schema file the document is validated against at load time
    pub schema_path: Option<PathBuf>,
    /// Section used by the `*_in_default` lookups
    pub default_section: Option<String>,
    /// Give each access context its own lookup cache (default: false)
    pub cache_enabled: bool,
    /// Validator used instead of the schema file
    #[serde(skip)]
    pub validator: Option<Arc<dyn SchemaValidator>>,
}

impl DocumentConfig {
    /// Create a configuration for a document file
    pub fn new<P: Into<PathBuf>>(file_path: P) -> Self {
        Self {
            file_path: file_path.into(),
            ..Default::default()
        }
    }

    /// Start building a configuration
    pub fn builder() -> DocumentConfigBuilder {
        DocumentConfigBuilder::default()
    }

    /// Read a configuration from a JSON file
    ///
    /// Relative document and schema paths are resolved against the
    /// configuration file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> JsonResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| JsonError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: DocumentConfig =
            serde_json::from_str(&text).map_err(|source| JsonError::Parse {
                origin: path.display().to_string(),
                source,
            })?;

        if let Some(base) = path.parent() {
            if config.file_path.is_relative() && !config.file_path.as_os_str().is_empty() {
                config.file_path = base.join(&config.file_path);
            }
            if let Some(schema) = config.schema_path.as_mut() {
                if schema.is_relative() {
                    *schema = base.join(&*schema);
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> JsonResult<()> {
        if self.file_path.as_os_str().is_empty() {
            return Err(JsonError::Config("File path cannot be empty".to_string()));
        }
        if self.default_section.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(JsonError::Config("Default section cannot be blank".to_string()));
        }
        Ok(())
    }

    /// Load the document this configuration describes
    pub fn open(&self) -> JsonResult<DocumentStore> {
        DocumentStore::load(self)
    }
}

/// Builder for [`DocumentConfig`]
#[derive(Debug, Default)]
pub struct DocumentConfigBuilder {
    config: DocumentConfig,
}

impl DocumentConfigBuilder {
    /// Set the document file
    pub fn file_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.file_path = path.into();
        self
    }

    /// Set the schema file
    pub fn schema_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.schema_path = Some(path.into());
        self
    }

    /// Set the default section
    pub fn default_section<S: Into<String>>(mut self, section: S) -> Self {
        self.config.default_section = Some(section.into());
        self
    }

    /// Enable or disable per-context caching
    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.config.cache_enabled = enabled;
        self
    }

    /// Validate with a custom validator instead of a schema file
    pub fn validator(mut self, validator: Arc<dyn SchemaValidator>) -> Self {
        self.config.validator = Some(validator);
        self
    }

    /// Finish the configuration
    pub fn build(self) -> JsonResult<DocumentConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
