//! Loaded documents

use std::sync::Arc;

use cellwise_core::ValueCoercer;
use serde_json::Value;

use crate::config::DocumentConfig;
use crate::context::AccessContext;
use crate::error::{JsonError, JsonResult};
use crate::lookup::Lookup;
use crate::schema::{JsonSchema, SchemaValidator};
use crate::tree::{DocumentTree, JsonTree};

/// A document loaded once, validated, and read through typed lookups
///
/// The store itself never caches. Cached reads go through an
/// [`AccessContext`] obtained from [`DocumentStore::context`].
#[derive(Debug, Clone)]
pub struct DocumentStore {
    tree: Arc<dyn DocumentTree>,
    coercer: ValueCoercer,
    default_section: Option<String>,
    cache_enabled: bool,
}

impl DocumentStore {
    /// Load and validate the document a configuration describes
    ///
    /// A configured validator takes precedence over `schema_path`. Any
    /// violation makes the load fail, and every violation is reported.
    pub fn load(config: &DocumentConfig) -> JsonResult<Self> {
        config.validate()?;
        let tree = JsonTree::from_file(&config.file_path)?;

        let mut store = Self::from_tree(Arc::new(tree)).with_cache(config.cache_enabled);
        if let Some(section) = &config.default_section {
            store = store.with_default_section(section.clone());
        }

        if let Some(validator) = &config.validator {
            store.validate_with(validator.as_ref())?;
        } else if let Some(schema_path) = &config.schema_path {
            let schema = JsonSchema::from_file(schema_path)?;
            store.validate_with(&schema)?;
        }

        tracing::info!(
            "Successfully loaded JSON data from '{}'",
            config.file_path.display()
        );
        Ok(store)
    }

    /// Wrap an already loaded tree
    pub fn from_tree(tree: Arc<dyn DocumentTree>) -> Self {
        Self {
            tree,
            coercer: ValueCoercer::default(),
            default_section: None,
            cache_enabled: false,
        }
    }

    /// Wrap an already parsed document
    pub fn from_value(document: Value) -> Self {
        Self::from_tree(Arc::new(JsonTree::new(document)))
    }

    /// Set the section used by the `*_in_default` lookups
    pub fn with_default_section<S: Into<String>>(mut self, section: S) -> Self {
        self.default_section = Some(section.into());
        self
    }

    /// Enable or disable per-context caching
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Use a coercer with custom options
    pub fn with_coercer(mut self, coercer: ValueCoercer) -> Self {
        self.coercer = coercer;
        self
    }

    /// Check the document against a validator
    pub fn validate_with(&self, validator: &dyn SchemaValidator) -> JsonResult<()> {
        let violations = validator.validate(self.tree.root());
        if violations.is_empty() {
            return Ok(());
        }
        for violation in &violations {
            tracing::warn!("Schema validation error: {}", violation);
        }
        Err(JsonError::SchemaInvalid { violations })
    }

    /// The document tree
    pub fn tree(&self) -> &dyn DocumentTree {
        self.tree.as_ref()
    }

    /// The whole document
    pub fn root(&self) -> &Value {
        self.tree.root()
    }

    /// Coercer used for typed lookups
    pub fn coercer(&self) -> &ValueCoercer {
        &self.coercer
    }

    /// Configured default section
    pub fn default_section(&self) -> Option<&str> {
        self.default_section.as_deref()
    }

    /// Whether access contexts cache lookups
    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    /// Open an access context
    ///
    /// Each context has its own cache (when caching is enabled), released
    /// when the context is closed or dropped.
    pub fn context(&self) -> AccessContext<'_> {
        AccessContext::new(self)
    }
}

impl Lookup for DocumentStore {
    fn store(&self) -> &DocumentStore {
        self
    }

    fn node(&self, section: &str, key: &str) -> JsonResult<Option<&Value>> {
        Ok(self.tree.lookup(section, key)?)
    }
}
