//! Materialized sheet cache

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use ahash::AHashMap;
use cellwise_core::{CoercionOptions, ValueCoercer};
use cellwise_sheet::{CsvReadOptions, Record, RecordMaterializer, Workbook};

use crate::error::Result;

type SheetKey = (PathBuf, String);

/// Records of loaded sheets, materialized once per (source, sheet)
///
/// Sources are anything [`Workbook::open_with_options`] accepts: a CSV file,
/// a directory of CSV files or a spreadsheet file.
#[derive(Debug, Default)]
pub struct SheetCache {
    csv_options: CsvReadOptions,
    materializer: RecordMaterializer,
    sheets: Mutex<AHashMap<SheetKey, Arc<Vec<Record>>>>,
}

impl SheetCache {
    /// Create an empty cache with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache with custom load and coercion options
    pub fn with_options(csv_options: CsvReadOptions, coercion: CoercionOptions) -> Self {
        Self {
            csv_options,
            materializer: RecordMaterializer::new(ValueCoercer::new(coercion)),
            sheets: Mutex::default(),
        }
    }

    /// All records of a sheet
    pub fn records<P: AsRef<Path>>(&self, source: P, sheet: &str) -> Result<Arc<Vec<Record>>> {
        let key = (source.as_ref().to_path_buf(), sheet.to_string());
        if let Some(records) = self.lock().get(&key) {
            tracing::debug!("Sheet cache hit for '{}' in '{}'", sheet, key.0.display());
            return Ok(Arc::clone(records));
        }

        let workbook = Workbook::open_with_options(&key.0, &self.csv_options)?;
        let records = Arc::new(self.materializer.materialize_all(workbook.sheet(sheet)?)?);
        tracing::debug!(
            "Materialized {} records from '{}' in '{}'",
            records.len(),
            sheet,
            key.0.display()
        );

        // A concurrent load of the same sheet may have won; keep the first.
        let mut sheets = self.lock();
        let entry = sheets.entry(key).or_insert(records);
        Ok(Arc::clone(entry))
    }

    /// The record at a position in a sheet's record sequence
    pub fn records_at<P: AsRef<Path>>(&self, source: P, sheet: &str, index: usize) -> Result<Option<Record>> {
        Ok(self.records(source, sheet)?.get(index).cloned())
    }

    /// Number of cached sheets
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every cached sheet
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AHashMap<SheetKey, Arc<Vec<Record>>>> {
        self.sheets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
