//! # cellwise
//!
//! Typed, validated and cached access to test data held in spreadsheets and
//! JSON documents.
//!
//! ## Features
//!
//! - Deterministic coercion of untyped cells and nodes into text, tiered
//!   numbers, booleans and dates, with an explicit "absent" outcome
//! - Sheet to record materialization with empty-row and empty-cell skipping
//! - Schema-validated JSON documents with typed lookups and per-context caches
//! - Sanitization of placeholder values before they reach test cases
//! - Zipping of case sequences from several sheets
//!
//! ## Example
//!
//! ```rust
//! use cellwise::prelude::*;
//!
//! let mut sheet = Worksheet::new("Bookings");
//! sheet.push_row(["Location", "NumberOfRooms"]);
//! sheet.push_row(["Sydney", "#N/A"]);
//! sheet.push_row(["Perth", "3"]);
//!
//! let records = RecordMaterializer::default().materialize_all(&sheet).unwrap();
//! let cases: Vec<_> = records
//!     .iter()
//!     .filter_map(|r| extract_columns(r, &["Location", "NumberOfRooms"]))
//!     .collect();
//!
//! assert_eq!(cases.len(), 1);
//! assert_eq!(cases[0][0].to_string(), "Perth");
//! ```

pub mod cache;
pub mod combine;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod sanitize;
pub mod session;

pub use cache::SheetCache;
pub use combine::{concat, zip_cases, ZipCases};
pub use error::{Error, Result};
pub use provider::{Case, DocumentProvider, SheetProvider};
pub use sanitize::{extract_columns, is_sentinel, is_valid_value, sanitize, SENTINEL_VALUES};
pub use session::DataSession;

// Re-export core types
pub use cellwise_core::{
    parse_boolean, parse_number, CellAccess, CellKind, CoercedValue, CoercionOptions, DateSystem,
    ErrorCode, EvaluationError, Number, RawValue, ValueCoercer,
};

// Re-export sheet types
pub use cellwise_sheet::{
    CachedResultEvaluator, CsvReadOptions, CsvReader, FormulaEvaluator, HeaderSet,
    MissingCellPolicy, Record, RecordMaterializer, Records, RowAccess, SheetAccess, SheetError,
    StoredCell, Workbook, Worksheet, XlsxReader,
};

// Re-export document types
pub use cellwise_json::{
    AccessContext, DocumentConfig, DocumentConfigBuilder, DocumentStore, DocumentTree, FromNode,
    JsonError, JsonSchema, JsonTree, Lookup, SchemaValidator, Violation,
};
