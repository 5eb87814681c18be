//! Sheet error types

use thiserror::Error;

/// Result type for sheet operations
pub type SheetResult<T> = std::result::Result<T, SheetError>;

/// Errors that can occur while reading sheets
#[derive(Debug, Error)]
pub enum SheetError {
    /// Header row missing or unusable
    #[error("Malformed sheet '{sheet}': {reason}")]
    MalformedSheet { sheet: String, reason: String },

    /// Sheet not found by name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// A sheet with the same name already exists
    #[error("Duplicate sheet name: {0}")]
    DuplicateSheet(String),

    /// Source path is not a CSV file, a spreadsheet file or a directory of CSV files
    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    /// A cell accessor failed while reading a cell
    #[error("{operation} failed at '{sheet}' row {row}, column {column}: {source}")]
    Cell {
        operation: &'static str,
        sheet: String,
        row: u32,
        column: u16,
        #[source]
        source: cellwise_core::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet library error
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] calamine::Error),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] cellwise_core::Error),
}

impl SheetError {
    /// Create a malformed-sheet error
    pub fn malformed<S: Into<String>, R: Into<String>>(sheet: S, reason: R) -> Self {
        SheetError::MalformedSheet {
            sheet: sheet.into(),
            reason: reason.into(),
        }
    }

    /// Annotate a core fault with the operation and cell location
    pub fn at_cell(
        operation: &'static str,
        sheet: &str,
        row: u32,
        column: u16,
        source: cellwise_core::Error,
    ) -> Self {
        SheetError::Cell {
            operation,
            sheet: sheet.to_string(),
            row,
            column,
            source,
        }
    }
}
