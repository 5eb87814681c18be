//! In-memory worksheet
//!
//! Sparse row-based storage: `BTreeMap<row, BTreeMap<column, StoredCell>>`.
//! A row can exist with no cells (a CSV line of empty fields), which is how
//! the "row present but empty" case is represented.

use std::collections::BTreeMap;
use std::sync::Arc;

use cellwise_core::{
    CellAccess, CellKind, DateSystem, ErrorCode, EvaluationError, RawValue, Result,
};
use chrono::NaiveDateTime;

use crate::access::{MissingCellPolicy, RowAccess, SheetAccess};
use crate::evaluator::{CachedResultEvaluator, FormulaEvaluator};

/// A stored cell: declared kind, raw value and formatting flags
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCell {
    kind: CellKind,
    raw: RawValue,
    formula: Option<String>,
    date_formatted: bool,
}

static BLANK_CELL: StoredCell = StoredCell::BLANK;

impl StoredCell {
    /// A stored blank cell (formatting only, no value)
    pub const BLANK: StoredCell = StoredCell {
        kind: CellKind::Blank,
        raw: RawValue::Blank,
        formula: None,
        date_formatted: false,
    };

    /// Text cell
    pub fn text<S: Into<String>>(s: S) -> Self {
        Self::declared(CellKind::String, RawValue::Text(s.into()))
    }

    /// Number cell
    pub fn number(n: f64) -> Self {
        Self::declared(CellKind::Numeric, RawValue::Number(n))
    }

    /// Boolean cell
    pub fn boolean(b: bool) -> Self {
        Self::declared(CellKind::Boolean, RawValue::Boolean(b))
    }

    /// Date cell: a date-formatted number holding the serial
    pub fn date(value: NaiveDateTime, system: DateSystem) -> Self {
        Self::number(system.datetime_to_serial(value)).date_formatted()
    }

    /// Error cell
    pub fn error(code: ErrorCode) -> Self {
        Self::declared(CellKind::Error, RawValue::Error(code))
    }

    /// Formula cell with an optional cached result
    pub fn formula<S: Into<String>>(text: S, cached: Option<RawValue>) -> Self {
        Self {
            kind: CellKind::Formula,
            raw: cached.unwrap_or(RawValue::Blank),
            formula: Some(text.into()),
            date_formatted: false,
        }
    }

    /// Cell whose declared kind differs from its raw representation
    pub fn declared(kind: CellKind, raw: RawValue) -> Self {
        Self {
            kind,
            raw,
            formula: None,
            date_formatted: false,
        }
    }

    /// Flag the cell's number as a date
    pub fn date_formatted(mut self) -> Self {
        self.date_formatted = true;
        self
    }

    /// Declared kind
    pub fn kind(&self) -> CellKind {
        self.kind
    }

    /// Raw value (cached result for formulas)
    pub fn raw(&self) -> &RawValue {
        &self.raw
    }

    /// Check if the cell's number is flagged as a date
    pub fn is_date(&self) -> bool {
        self.date_formatted
    }

    /// Check if this is a stored blank
    pub fn is_blank(&self) -> bool {
        self.kind == CellKind::Blank
    }
}

impl Default for StoredCell {
    fn default() -> Self {
        StoredCell::BLANK
    }
}

impl From<RawValue> for StoredCell {
    fn from(raw: RawValue) -> Self {
        StoredCell::declared(raw.kind(), raw)
    }
}

impl From<&str> for StoredCell {
    fn from(s: &str) -> Self {
        StoredCell::text(s)
    }
}

impl From<String> for StoredCell {
    fn from(s: String) -> Self {
        StoredCell::text(s)
    }
}

impl From<f64> for StoredCell {
    fn from(n: f64) -> Self {
        StoredCell::number(n)
    }
}

impl From<i32> for StoredCell {
    fn from(n: i32) -> Self {
        StoredCell::number(f64::from(n))
    }
}

impl From<bool> for StoredCell {
    fn from(b: bool) -> Self {
        StoredCell::boolean(b)
    }
}

/// A worksheet (single sheet in a workbook)
#[derive(Debug, Clone)]
pub struct Worksheet {
    name: String,
    rows: BTreeMap<u32, BTreeMap<u16, StoredCell>>,
    evaluator: Arc<dyn FormulaEvaluator>,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            rows: BTreeMap::new(),
            evaluator: Arc::new(CachedResultEvaluator),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Replace the formula evaluator
    pub fn set_evaluator(&mut self, evaluator: Arc<dyn FormulaEvaluator>) {
        self.evaluator = evaluator;
    }

    /// Store a cell
    pub fn set_cell_at<C: Into<StoredCell>>(&mut self, row: u32, col: u16, cell: C) {
        self.rows.entry(row).or_default().insert(col, cell.into());
    }

    /// Get a stored cell
    pub fn cell_at(&self, row: u32, col: u16) -> Option<&StoredCell> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    /// Remove a cell, keeping its row
    pub fn clear_cell_at(&mut self, row: u32, col: u16) -> Option<StoredCell> {
        self.rows.get_mut(&row).and_then(|r| r.remove(&col))
    }

    /// Ensure a row exists, even with no cells
    pub fn touch_row(&mut self, row: u32) {
        self.rows.entry(row).or_default();
    }

    /// Replace a row with the given cells, starting at column 0
    pub fn set_row<I, C>(&mut self, row: u32, cells: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<StoredCell>,
    {
        let cells: BTreeMap<u16, StoredCell> = cells
            .into_iter()
            .enumerate()
            .map(|(col, cell)| (col as u16, cell.into()))
            .collect();
        self.rows.insert(row, cells);
    }

    /// Append a row after the last physical row
    pub fn push_row<I, C>(&mut self, cells: I) -> u32
    where
        I: IntoIterator<Item = C>,
        C: Into<StoredCell>,
    {
        let row = self.next_row();
        self.set_row(row, cells);
        row
    }

    /// Remove a row entirely
    pub fn remove_row(&mut self, row: u32) {
        self.rows.remove(&row);
    }

    /// Index the next pushed row would get
    pub fn next_row(&self) -> u32 {
        self.rows.keys().next_back().map_or(0, |last| last + 1)
    }

    /// Number of stored cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    /// Check if the sheet has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl SheetAccess for Worksheet {
    type Row<'a> = WorksheetRow<'a> where Self: 'a;

    fn name(&self) -> &str {
        &self.name
    }

    fn row_count(&self) -> Result<u32> {
        Ok(self.next_row())
    }

    fn row(&self, index: u32) -> Result<Option<WorksheetRow<'_>>> {
        Ok(self.rows.get(&index).map(|cells| WorksheetRow {
            sheet: self,
            index,
            cells,
        }))
    }
}

/// Borrowed view of one worksheet row
#[derive(Debug, Clone, Copy)]
pub struct WorksheetRow<'a> {
    sheet: &'a Worksheet,
    index: u32,
    cells: &'a BTreeMap<u16, StoredCell>,
}

impl<'a> RowAccess for WorksheetRow<'a> {
    type Cell = SheetCell<'a>;

    fn index(&self) -> u32 {
        self.index
    }

    fn columns(&self) -> Vec<u16> {
        self.cells.keys().copied().collect()
    }

    fn cell(&self, column: u16, policy: MissingCellPolicy) -> Result<Option<SheetCell<'a>>> {
        let stored = match (self.cells.get(&column), policy) {
            (Some(cell), MissingCellPolicy::ReturnBlankAsNull) if cell.is_blank() => None,
            (Some(cell), _) => Some(cell),
            (None, MissingCellPolicy::ReturnBlank) => Some(&BLANK_CELL),
            (None, _) => None,
        };
        Ok(stored.map(|stored| SheetCell {
            sheet: self.sheet,
            row: self.index,
            column,
            stored,
        }))
    }
}

/// Borrowed view of one worksheet cell
#[derive(Debug, Clone, Copy)]
pub struct SheetCell<'a> {
    sheet: &'a Worksheet,
    row: u32,
    column: u16,
    stored: &'a StoredCell,
}

impl<'a> SheetCell<'a> {
    /// Owning worksheet
    pub fn sheet(&self) -> &'a Worksheet {
        self.sheet
    }

    /// Row index
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Column index
    pub fn column(&self) -> u16 {
        self.column
    }

    /// Formula source text, if any
    pub fn formula_text(&self) -> Option<&'a str> {
        self.stored.formula.as_deref()
    }

    /// Result cached with the formula (blank when none)
    pub fn cached_result(&self) -> &'a RawValue {
        &self.stored.raw
    }
}

impl CellAccess for SheetCell<'_> {
    fn kind(&self) -> CellKind {
        self.stored.kind
    }

    fn raw_value(&self) -> Result<RawValue> {
        Ok(self.stored.raw.clone())
    }

    fn is_date_formatted(&self) -> bool {
        self.stored.date_formatted
    }

    fn formula(&self) -> Result<Option<String>> {
        Ok(self.stored.formula.clone())
    }

    fn evaluate(&self) -> std::result::Result<RawValue, EvaluationError> {
        if self.stored.kind != CellKind::Formula {
            return Ok(self.stored.raw.clone());
        }
        self.sheet.evaluator.evaluate(self)
    }
}
