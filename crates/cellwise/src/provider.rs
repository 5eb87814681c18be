//! Data providers: named sources of parametrized test cases
//!
//! A case is one ordered list of values handed to one test invocation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cellwise_core::CoercedValue;
use cellwise_json::{FromNode, Lookup};

use crate::cache::SheetCache;
use crate::combine::zip_cases;
use crate::error::{Error, Result};
use crate::sanitize::{extract_columns, is_valid_value, sanitize};

/// One test case
pub type Case = Vec<CoercedValue>;

/// Cases drawn from the sheets of one source
#[derive(Debug, Clone)]
pub struct SheetProvider {
    source: PathBuf,
    cache: Arc<SheetCache>,
}

impl SheetProvider {
    /// Provider over a source with its own cache
    pub fn new<P: Into<PathBuf>>(source: P) -> Self {
        Self::with_cache(source, Arc::new(SheetCache::new()))
    }

    /// Provider over a source sharing `cache` with other providers
    pub fn with_cache<P: Into<PathBuf>>(source: P, cache: Arc<SheetCache>) -> Self {
        Self {
            source: source.into(),
            cache,
        }
    }

    /// The source path
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// A single sanitized value from the record at `index`
    ///
    /// A missing record or column yields empty text, with a warning.
    pub fn value_by_index(&self, sheet: &str, column: &str, index: usize) -> Result<CoercedValue> {
        self.check_arguments(sheet, &[column])?;
        match self.cache.records_at(&self.source, sheet, index)? {
            Some(record) if record.contains(column) => Ok(sanitize(&record.value(column))),
            _ => {
                tracing::warn!("No data found for column {} at index {}", column, index);
                Ok(CoercedValue::text(""))
            }
        }
    }

    /// One single-value case per record holding a valid value in `column`
    pub fn column_data(&self, sheet: &str, column: &str) -> Result<Vec<Case>> {
        self.check_arguments(sheet, &[column])?;
        let records = self.cache.records(&self.source, sheet)?;

        let cases: Vec<Case> = records
            .iter()
            .map(|record| sanitize(&record.value(column)))
            .filter(is_valid_value)
            .map(|value| vec![value])
            .collect();

        if cases.is_empty() {
            tracing::warn!("No valid data found for column: {}", column);
        }
        Ok(cases)
    }

    /// One case per record where every column holds a valid value
    pub fn multi_column_data<S: AsRef<str>>(&self, sheet: &str, columns: &[S]) -> Result<Vec<Case>> {
        self.check_arguments(sheet, columns)?;
        let records = self.cache.records(&self.source, sheet)?;

        let cases: Vec<Case> = records
            .iter()
            .filter_map(|record| extract_columns(record, columns))
            .collect();

        if cases.is_empty() {
            tracing::warn!("No valid data found for columns: {:?}", names(columns));
        }
        Ok(cases)
    }

    /// Multi-column cases of several sheets, zipped by position
    ///
    /// The result is as long as the shortest input.
    pub fn combined_data<S: AsRef<str>>(&self, parts: &[(&str, &[S])]) -> Result<Vec<Case>> {
        if parts.is_empty() {
            return Err(Error::invalid_argument("At least one sheet is required"));
        }
        let sources = parts
            .iter()
            .map(|(sheet, columns)| self.multi_column_data(sheet, columns).map(Vec::into_iter))
            .collect::<Result<Vec<_>>>()?;
        Ok(zip_cases(sources).collect())
    }

    fn check_arguments<S: AsRef<str>>(&self, sheet: &str, columns: &[S]) -> Result<()> {
        if self.source.as_os_str().is_empty() {
            return Err(Error::invalid_argument("File path cannot be empty"));
        }
        if sheet.trim().is_empty() {
            return Err(Error::invalid_argument("Sheet name cannot be empty"));
        }
        if columns.is_empty() {
            return Err(Error::invalid_argument("Column names cannot be empty"));
        }
        if columns.iter().any(|c| c.as_ref().trim().is_empty()) {
            return Err(Error::invalid_argument("Column name cannot be empty"));
        }
        Ok(())
    }
}

fn names<S: AsRef<str>>(columns: &[S]) -> Vec<&str> {
    columns.iter().map(AsRef::as_ref).collect()
}

/// Cases drawn from the array sections of a document
#[derive(Debug)]
pub struct DocumentProvider<'a, L> {
    lookup: &'a L,
}

impl<'a, L: Lookup> DocumentProvider<'a, L> {
    /// Provider reading through a store or an access context
    pub fn new(lookup: &'a L) -> Self {
        Self { lookup }
    }

    /// One case per string element
    pub fn strings(&self, section: &str) -> Result<Vec<Case>> {
        self.cases::<String>(section)
    }

    /// One case per integer element
    pub fn integers(&self, section: &str) -> Result<Vec<Case>> {
        self.cases::<i32>(section)
    }

    /// One case per boolean element
    pub fn booleans(&self, section: &str) -> Result<Vec<Case>> {
        self.cases::<bool>(section)
    }

    fn cases<T>(&self, section: &str) -> Result<Vec<Case>>
    where
        T: FromNode + Into<CoercedValue>,
    {
        if section.trim().is_empty() {
            return Err(Error::invalid_argument("Section cannot be empty"));
        }
        let values: Vec<T> = self.lookup.get_all(section)?;
        Ok(values.into_iter().map(|v| vec![v.into()]).collect())
    }
}
