//! Tabular accessor traits
//!
//! The record materializer reads sheets only through these traits, so any
//! backend that can answer "how many rows", "give me row N" and "give me the
//! cell at column C" can be materialized.

use cellwise_core::{CellAccess, Result};

/// What a row returns for a cell that is missing or blank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingCellPolicy {
    /// Missing cells are `None`, stored blank cells are returned
    #[default]
    ReturnNull,
    /// Missing cells are returned as blank cells
    ReturnBlank,
    /// Both missing and stored blank cells are `None`
    ReturnBlankAsNull,
}

/// One physical row of a sheet
pub trait RowAccess {
    /// Cell view type
    type Cell: CellAccess;

    /// Row index (0-based)
    fn index(&self) -> u32;

    /// Columns that physically hold a cell, ascending
    fn columns(&self) -> Vec<u16>;

    /// Get the cell at `column` under the given policy
    fn cell(&self, column: u16, policy: MissingCellPolicy) -> Result<Option<Self::Cell>>;
}

/// A named sheet of rows
///
/// Accessors are not expected to be reentrant; read one sheet from one
/// thread at a time.
pub trait SheetAccess {
    /// Row view type
    type Row<'a>: RowAccess
    where
        Self: 'a;

    /// Sheet name
    fn name(&self) -> &str;

    /// One past the index of the last physical row (0 for an empty sheet)
    fn row_count(&self) -> Result<u32>;

    /// Get a row; `None` when it does not physically exist
    fn row(&self, index: u32) -> Result<Option<Self::Row<'_>>>;
}
