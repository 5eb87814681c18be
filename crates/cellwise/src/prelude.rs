//! Prelude module - common imports for cellwise users
//!
//! ```rust
//! use cellwise::prelude::*;
//! ```

pub use crate::{
    // Sanitizing and combining
    extract_columns,
    is_valid_value,
    sanitize,
    zip_cases,
    // Providers and sessions
    Case,
    DataSession,
    DocumentProvider,
    SheetCache,
    SheetProvider,

    // Values
    CoercedValue,
    Number,
    ValueCoercer,

    // Sheets
    CsvReadOptions,
    Record,
    RecordMaterializer,
    SheetAccess,
    Workbook,
    Worksheet,

    // Documents
    DocumentConfig,
    DocumentStore,
    Lookup,

    // Error types
    Error,
    Result,
};
