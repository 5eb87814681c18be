//! # cellwise-sheet
//!
//! Tabular sheet access and record materialization for cellwise.
//!
//! - [`SheetAccess`] / [`RowAccess`] - the tabular accessor a storage backend implements
//! - [`Workbook`] / [`Worksheet`] - an in-memory backend, loadable from CSV or spreadsheet files
//! - [`RecordMaterializer`] - turns a sheet into a lazily streamed sequence of [`Record`]s
//!
//! ## Example
//!
//! ```rust
//! use cellwise_sheet::{RecordMaterializer, Worksheet};
//!
//! let mut sheet = Worksheet::new("Bookings");
//! sheet.push_row(["Location", "NumberOfRooms"]);
//! sheet.push_row(["Sydney", "2"]);
//!
//! let records = RecordMaterializer::default().materialize_all(&sheet).unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].get("Location").unwrap().to_string(), "Sydney");
//! ```

mod access;
mod csv_source;
mod error;
mod evaluator;
mod materialize;
mod record;
mod workbook;
mod worksheet;
mod xlsx_source;

pub use access::{MissingCellPolicy, RowAccess, SheetAccess};
pub use csv_source::{CsvReadOptions, CsvReader};
pub use error::{SheetError, SheetResult};
pub use evaluator::{CachedResultEvaluator, FormulaEvaluator};
pub use materialize::{HeaderSet, RecordMaterializer, Records};
pub use record::Record;
pub use workbook::Workbook;
pub use worksheet::{SheetCell, StoredCell, Worksheet, WorksheetRow};
pub use xlsx_source::XlsxReader;
