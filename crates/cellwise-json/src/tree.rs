//! Document tree access
//!
//! A loaded document is immutable and shared behind an `Arc`, so any number of
//! access contexts can read it concurrently.

use std::fmt;
use std::fs;
use std::path::Path;

use cellwise_core::Result;
use serde_json::Value;

use crate::error::{JsonError, JsonResult};

/// Read access to a loaded document
pub trait DocumentTree: Send + Sync + fmt::Debug {
    /// The whole document
    fn root(&self) -> &Value;

    /// Node of a section
    ///
    /// A top-level member named exactly `section` wins; otherwise a dotted
    /// name walks nested objects (`"hotel.rates"`).
    fn section(&self, section: &str) -> Result<Option<&Value>> {
        Ok(walk(self.root(), section))
    }

    /// Node stored under `key` in `section`; `null` counts as missing
    fn lookup(&self, section: &str, key: &str) -> Result<Option<&Value>> {
        Ok(self
            .section(section)?
            .and_then(|node| node.get(key))
            .filter(|node| !node.is_null()))
    }
}

/// A document parsed with `serde_json`
#[derive(Debug, Clone, PartialEq)]
pub struct JsonTree {
    root: Value,
}

impl JsonTree {
    /// Wrap an already parsed document
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Parse document text
    pub fn parse(text: &str) -> JsonResult<Self> {
        serde_json::from_str(text)
            .map(Self::new)
            .map_err(|source| JsonError::Parse {
                origin: "<inline>".to_string(),
                source,
            })
    }

    /// Read and parse a document file
    pub fn from_file<P: AsRef<Path>>(path: P) -> JsonResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| JsonError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text)
            .map(Self::new)
            .map_err(|source| JsonError::Parse {
                origin: path.display().to_string(),
                source,
            })
    }

    /// Take the document back
    pub fn into_inner(self) -> Value {
        self.root
    }
}

impl DocumentTree for JsonTree {
    fn root(&self) -> &Value {
        &self.root
    }
}

fn walk<'v>(root: &'v Value, section: &str) -> Option<&'v Value> {
    if let Some(node) = root.get(section) {
        return Some(node);
    }
    if !section.contains('.') {
        return None;
    }
    section
        .split('.')
        .try_fold(root, |node, part| node.get(part))
}
