//! Boundary types shared with the storage layer
//!
//! A storage backend (an in-memory worksheet, a CSV file, a JSON node) exposes
//! each cell through [`CellAccess`]: a declared [`CellKind`], the raw stored
//! [`RawValue`], and a formula evaluation capability. The coercion engine
//! only ever talks to cells through this trait.

use std::fmt;

use thiserror::Error;

use crate::error::Result;

/// Declared primitive kind of a cell, as reported by the storage layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Text cell
    String,
    /// Number cell (dates are numbers with a date format)
    Numeric,
    /// TRUE/FALSE cell
    Boolean,
    /// Formula cell; its value comes from the evaluator
    Formula,
    /// Empty or unknown cell
    Blank,
    /// Error cell (#VALUE!, #REF!, ...)
    Error,
}

impl CellKind {
    /// Get the kind name for messages
    pub fn as_str(&self) -> &'static str {
        match self {
            CellKind::String => "string",
            CellKind::Numeric => "numeric",
            CellKind::Boolean => "boolean",
            CellKind::Formula => "formula",
            CellKind::Blank => "blank",
            CellKind::Error => "error",
        }
    }

    /// Parse a kind name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "text" => Some(CellKind::String),
            "numeric" | "number" => Some(CellKind::Numeric),
            "boolean" | "bool" => Some(CellKind::Boolean),
            "formula" => Some(CellKind::Formula),
            "blank" | "empty" => Some(CellKind::Blank),
            "error" => Some(CellKind::Error),
            _ => None,
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spreadsheet error codes a cell or a formula result can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// #NULL!
    Null,
    /// #DIV/0!
    Div0,
    /// #VALUE!
    Value,
    /// #REF!
    Ref,
    /// #NAME?
    Name,
    /// #NUM!
    Num,
    /// #N/A
    Na,
}

impl ErrorCode {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Null => "#NULL!",
            ErrorCode::Div0 => "#DIV/0!",
            ErrorCode::Value => "#VALUE!",
            ErrorCode::Ref => "#REF!",
            ErrorCode::Name => "#NAME?",
            ErrorCode::Num => "#NUM!",
            ErrorCode::Na => "#N/A",
        }
    }

    /// Parse an error string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "#NULL!" => Some(ErrorCode::Null),
            "#DIV/0!" => Some(ErrorCode::Div0),
            "#VALUE!" => Some(ErrorCode::Value),
            "#REF!" => Some(ErrorCode::Ref),
            "#NAME?" => Some(ErrorCode::Name),
            "#NUM!" => Some(ErrorCode::Num),
            "#N/A" => Some(ErrorCode::Na),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw stored representation of a cell, or the result of evaluating a formula
///
/// The variant does not have to agree with the declared [`CellKind`]: a CSV
/// column declared numeric still stores its fields as text, and the coercion
/// rules decide what to make of it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Nothing stored
    Blank,
    /// Text as stored (untrimmed)
    Text(String),
    /// IEEE double, including date serials
    Number(f64),
    /// Native boolean
    Boolean(bool),
    /// Error code
    Error(ErrorCode),
}

impl RawValue {
    /// Create a text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        RawValue::Text(s.into())
    }

    /// Kind this raw value naturally corresponds to
    pub fn kind(&self) -> CellKind {
        match self {
            RawValue::Blank => CellKind::Blank,
            RawValue::Text(_) => CellKind::String,
            RawValue::Number(_) => CellKind::Numeric,
            RawValue::Boolean(_) => CellKind::Boolean,
            RawValue::Error(_) => CellKind::Error,
        }
    }

    /// Check if nothing is stored
    pub fn is_blank(&self) -> bool {
        matches!(self, RawValue::Blank)
    }
}

impl Default for RawValue {
    fn default() -> Self {
        RawValue::Blank
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::text(s)
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Boolean(b)
    }
}

/// Failure reported by a formula evaluator
///
/// Never fatal: the coercer falls back to the formula source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("formula evaluation failed: {message}")]
pub struct EvaluationError {
    /// Human-readable reason
    pub message: String,
}

impl EvaluationError {
    /// Create a new evaluation error
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Read access to a single cell of some storage backend
///
/// Accessor methods return [`crate::Error::Read`] only for structural faults
/// (a truncated stream, a corrupt part). Formula evaluation failures are a
/// separate, soft channel.
pub trait CellAccess {
    /// Declared kind of the cell
    fn kind(&self) -> CellKind;

    /// Raw stored value
    fn raw_value(&self) -> Result<RawValue>;

    /// Whether the storage layer flags this cell's number as a date
    fn is_date_formatted(&self) -> bool {
        false
    }

    /// Formula source text, if the cell holds a formula
    fn formula(&self) -> Result<Option<String>> {
        Ok(None)
    }

    /// Evaluate the cell's formula and return the result
    fn evaluate(&self) -> std::result::Result<RawValue, EvaluationError> {
        Err(EvaluationError::new("no formula evaluator available"))
    }
}

impl<C: CellAccess + ?Sized> CellAccess for &C {
    fn kind(&self) -> CellKind {
        (**self).kind()
    }

    fn raw_value(&self) -> Result<RawValue> {
        (**self).raw_value()
    }

    fn is_date_formatted(&self) -> bool {
        (**self).is_date_formatted()
    }

    fn formula(&self) -> Result<Option<String>> {
        (**self).formula()
    }

    fn evaluate(&self) -> std::result::Result<RawValue, EvaluationError> {
        (**self).evaluate()
    }
}
