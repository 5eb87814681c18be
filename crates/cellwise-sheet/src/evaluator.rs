//! Formula evaluation capability
//!
//! cellwise does not implement a formula language. A worksheet delegates to a
//! [`FormulaEvaluator`]; the default one reports the result cached alongside
//! the formula when the file was saved.

use std::fmt;

use cellwise_core::{EvaluationError, RawValue};

use crate::worksheet::SheetCell;

/// Evaluates formula cells
pub trait FormulaEvaluator: Send + Sync + fmt::Debug {
    /// Evaluate the formula held by `cell`
    fn evaluate(&self, cell: &SheetCell<'_>) -> Result<RawValue, EvaluationError>;
}

/// Returns the result cached with the formula
///
/// A formula without a cached result is an evaluation failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct CachedResultEvaluator;

impl FormulaEvaluator for CachedResultEvaluator {
    fn evaluate(&self, cell: &SheetCell<'_>) -> Result<RawValue, EvaluationError> {
        match cell.cached_result() {
            RawValue::Blank => Err(EvaluationError::new(format!(
                "no cached result for formula at row {}, column {}",
                cell.row(),
                cell.column()
            ))),
            value => Ok(value.clone()),
        }
    }
}
