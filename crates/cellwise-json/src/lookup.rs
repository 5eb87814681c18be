//! Typed document lookups
//!
//! Every accessor comes in two styles. Required accessors (`get`,
//! `get_by_index`, `get_string`, ...) fail with [`JsonError::MissingValue`]
//! when the value is absent or does not convert to the requested type.
//! Optional accessors (`get_optional`, ...) return `None` instead and only
//! fail on structural faults.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{JsonError, JsonResult};
use crate::node::FromNode;
use crate::store::DocumentStore;

/// Typed reads against a [`DocumentStore`]
pub trait Lookup {
    /// The store being read
    fn store(&self) -> &DocumentStore;

    /// Node stored under `key` in `section`
    fn node(&self, section: &str, key: &str) -> JsonResult<Option<&Value>>;

    /// Read a required value
    fn get<T: FromNode>(&self, section: &str, key: &str) -> JsonResult<T> {
        self.get_optional(section, key)?
            .ok_or_else(|| JsonError::missing(T::KIND, format!("section '{section}', key '{key}'")))
    }

    /// Read an optional value
    fn get_optional<T: FromNode>(&self, section: &str, key: &str) -> JsonResult<Option<T>> {
        match self.node(section, key)? {
            Some(node) => Ok(T::from_node(node, self.store().coercer())?),
            None => Ok(None),
        }
    }

    /// Read a required value from the default section
    fn get_in_default<T: FromNode>(&self, key: &str) -> JsonResult<T> {
        let section = default_section(self.store())?;
        self.get(section, key)
    }

    /// Read an optional value from the default section
    fn get_optional_in_default<T: FromNode>(&self, key: &str) -> JsonResult<Option<T>> {
        let section = default_section(self.store())?;
        self.get_optional(section, key)
    }

    /// Read a required element of an array section
    fn get_by_index<T: FromNode>(&self, section: &str, index: usize) -> JsonResult<T> {
        self.get_optional_by_index(section, index)?
            .ok_or_else(|| JsonError::missing(T::KIND, format!("section '{section}', index {index}")))
    }

    /// Read an optional element of an array section
    ///
    /// An index out of bounds or a section that is not an array is `None`.
    fn get_optional_by_index<T: FromNode>(&self, section: &str, index: usize) -> JsonResult<Option<T>> {
        let store = self.store();
        let item = store
            .tree()
            .section(section)?
            .and_then(Value::as_array)
            .and_then(|items| items.get(index));
        match item {
            Some(node) => Ok(T::from_node(node, store.coercer())?),
            None => Ok(None),
        }
    }

    /// Read every element of an array section that converts to `T`
    ///
    /// A missing or non-array section yields an empty list.
    fn get_all<T: FromNode>(&self, section: &str) -> JsonResult<Vec<T>> {
        let store = self.store();
        let Some(items) = store.tree().section(section)?.and_then(Value::as_array) else {
            return Ok(Vec::new());
        };

        let mut values = Vec::with_capacity(items.len());
        for (index, node) in items.iter().enumerate() {
            match T::from_node(node, store.coercer())? {
                Some(value) => values.push(value),
                None => tracing::debug!(
                    "Skipping element {} of '{}': not a {} value",
                    index,
                    section,
                    T::KIND
                ),
            }
        }
        Ok(values)
    }

    /// Map a required node onto a `serde` type
    fn get_deserialized<T: DeserializeOwned>(&self, section: &str, key: &str) -> JsonResult<T> {
        let location = format!("section '{section}', key '{key}'");
        let node = self
            .node(section, key)?
            .ok_or_else(|| JsonError::missing("object", location.clone()))?;
        serde_json::from_value(node.clone()).map_err(|source| JsonError::Deserialize { location, source })
    }

    /// Read a required string
    fn get_string(&self, section: &str, key: &str) -> JsonResult<String> {
        self.get(section, key)
    }

    /// Read a required 32-bit integer
    fn get_int(&self, section: &str, key: &str) -> JsonResult<i32> {
        self.get(section, key)
    }

    /// Read a required 64-bit integer
    fn get_long(&self, section: &str, key: &str) -> JsonResult<i64> {
        self.get(section, key)
    }

    /// Read a required boolean
    fn get_boolean(&self, section: &str, key: &str) -> JsonResult<bool> {
        self.get(section, key)
    }

    /// Read an optional string
    fn get_optional_string(&self, section: &str, key: &str) -> JsonResult<Option<String>> {
        self.get_optional(section, key)
    }

    /// Read an optional 32-bit integer
    fn get_optional_int(&self, section: &str, key: &str) -> JsonResult<Option<i32>> {
        self.get_optional(section, key)
    }

    /// Read an optional boolean
    fn get_optional_boolean(&self, section: &str, key: &str) -> JsonResult<Option<bool>> {
        self.get_optional(section, key)
    }

    /// Read a required string element
    fn get_string_by_index(&self, section: &str, index: usize) -> JsonResult<String> {
        self.get_by_index(section, index)
    }

    /// Read a required 32-bit integer element
    fn get_int_by_index(&self, section: &str, index: usize) -> JsonResult<i32> {
        self.get_by_index(section, index)
    }

    /// Read a required boolean element
    fn get_boolean_by_index(&self, section: &str, index: usize) -> JsonResult<bool> {
        self.get_by_index(section, index)
    }

    /// Read every string element
    fn get_all_strings(&self, section: &str) -> JsonResult<Vec<String>> {
        self.get_all(section)
    }

    /// Read every 32-bit integer element
    fn get_all_integers(&self, section: &str) -> JsonResult<Vec<i32>> {
        self.get_all(section)
    }

    /// Read every boolean element
    fn get_all_booleans(&self, section: &str) -> JsonResult<Vec<bool>> {
        self.get_all(section)
    }
}

fn default_section(store: &DocumentStore) -> JsonResult<&str> {
    store
        .default_section()
        .ok_or_else(|| JsonError::Config("No default section configured".to_string()))
}
