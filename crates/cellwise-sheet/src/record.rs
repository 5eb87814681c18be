//! Materialized records

use cellwise_core::CoercedValue;
use indexmap::IndexMap;

/// One data row keyed by header name, in source column order
///
/// Only usable values are stored; a field that is missing from a record was
/// blank or unparseable in the source row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: IndexMap<String, CoercedValue>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field
    ///
    /// Setting an existing name replaces its value but keeps its position, so
    /// with duplicate headers the later column wins.
    pub fn insert<S: Into<String>>(&mut self, name: S, value: CoercedValue) -> Option<CoercedValue> {
        self.fields.insert(name.into(), value)
    }

    /// Get a field
    pub fn get(&self, name: &str) -> Option<&CoercedValue> {
        self.fields.get(name)
    }

    /// Get a field, or `Absent` when missing
    pub fn value(&self, name: &str) -> CoercedValue {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    /// Check if a field is present
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in column order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterate fields in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CoercedValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<S: Into<String>> FromIterator<(S, CoercedValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (S, CoercedValue)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, CoercedValue);
    type IntoIter = indexmap::map::IntoIter<String, CoercedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
