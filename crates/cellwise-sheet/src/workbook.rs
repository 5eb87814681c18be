//! Workbook type - a named collection of worksheets

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::csv_source::{CsvReadOptions, CsvReader};
use crate::error::{SheetError, SheetResult};
use crate::evaluator::FormulaEvaluator;
use crate::worksheet::Worksheet;
use crate::xlsx_source::XlsxReader;

/// A workbook (collection of worksheets)
///
/// Loaded from a single CSV file (one sheet named after the file stem), a
/// directory of CSV files (one sheet per file, in file name order) or a
/// spreadsheet file (every sheet, in workbook order).
#[derive(Debug, Default)]
pub struct Workbook {
    worksheets: Vec<Worksheet>,
}

impl Workbook {
    /// Create an empty workbook
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a source with default options
    pub fn open<P: AsRef<Path>>(path: P) -> SheetResult<Self> {
        Self::open_with_options(path, &CsvReadOptions::default())
    }

    /// Open a CSV file, a directory of CSV files or a spreadsheet file
    ///
    /// Spreadsheet files only take `date_system` from `options`.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> SheetResult<Self> {
        let path = path.as_ref();
        let mut workbook = Self::new();

        if path.is_dir() {
            let mut files: Vec<_> = fs::read_dir(path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_csv(p))
                .collect();
            files.sort();
            for file in files {
                workbook.add_worksheet(CsvReader::read_file(&file, options)?)?;
            }
        } else if is_csv(path) {
            workbook.add_worksheet(CsvReader::read_file(path, options)?)?;
        } else if XlsxReader::supports(path) {
            for worksheet in XlsxReader::read_file(path, options.date_system)? {
                workbook.add_worksheet(worksheet)?;
            }
        } else {
            return Err(SheetError::UnsupportedSource(path.display().to_string()));
        }

        tracing::info!(
            "Opened workbook '{}' with {} sheet(s)",
            path.display(),
            workbook.sheet_count()
        );
        Ok(workbook)
    }

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Check if the workbook has no worksheets
    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a worksheet by name
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name() == name)
    }

    /// Get a worksheet by name, failing when it does not exist
    pub fn sheet(&self, name: &str) -> SheetResult<&Worksheet> {
        self.worksheet_by_name(name)
            .ok_or_else(|| SheetError::SheetNotFound(name.to_string()))
    }

    /// Get a mutable worksheet by name
    pub fn worksheet_by_name_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.worksheets.iter_mut().find(|ws| ws.name() == name)
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Sheet names in order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.worksheets.iter().map(Worksheet::name).collect()
    }

    /// Add a worksheet; names must be unique
    pub fn add_worksheet(&mut self, worksheet: Worksheet) -> SheetResult<usize> {
        if self.worksheet_by_name(worksheet.name()).is_some() {
            return Err(SheetError::DuplicateSheet(worksheet.name().to_string()));
        }
        let index = self.worksheets.len();
        self.worksheets.push(worksheet);
        Ok(index)
    }

    /// Add an empty worksheet with the given name
    pub fn add_worksheet_with_name(&mut self, name: &str) -> SheetResult<usize> {
        self.add_worksheet(Worksheet::new(name))
    }

    /// Remove a worksheet by name
    pub fn remove_worksheet(&mut self, name: &str) -> SheetResult<Worksheet> {
        let index = self
            .worksheets
            .iter()
            .position(|ws| ws.name() == name)
            .ok_or_else(|| SheetError::SheetNotFound(name.to_string()))?;
        Ok(self.worksheets.remove(index))
    }

    /// Use `evaluator` for formulas in every worksheet
    pub fn set_evaluator(&mut self, evaluator: Arc<dyn FormulaEvaluator>) {
        for worksheet in &mut self.worksheets {
            worksheet.set_evaluator(Arc::clone(&evaluator));
        }
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}
