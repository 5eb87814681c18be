//! Type inference and fallback rules for a single cell
//!
//! The rules, by declared kind:
//!
//! - `String`: trim; usable only when non-empty.
//! - `Numeric`: a date-formatted number becomes a date, anything else is tiered
//!   by [`Number::from_f64`]. Numeric text is parsed after stripping thousands
//!   separators and whitespace; text that still does not parse is absent.
//! - `Boolean`: native booleans pass through; text matches
//!   `true/yes/1` or `false/no/0` case-insensitively, anything else is absent.
//! - `Formula`: the evaluator's result is coerced by the rule for its own kind.
//!   If evaluation fails the formula source text is used as a string.
//! - anything else: absent.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::cell::{CellAccess, CellKind, RawValue};
use crate::date::DateSystem;
use crate::error::Result;
use crate::value::{CoercedValue, Number};
use crate::DEFAULT_DATE_FORMAT;

/// Options controlling how values are coerced and rendered
#[derive(Debug, Clone)]
pub struct CoercionOptions {
    /// `chrono` format used when a date is rendered as text (default: `%Y-%m-%d`)
    pub date_format: String,
    /// Date system used to interpret serials
    pub date_system: DateSystem,
}

impl Default for CoercionOptions {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            date_system: DateSystem::Excel1900,
        }
    }
}

/// Converts single cells into [`CoercedValue`]s
///
/// Stateless apart from its options; cheap to clone and share.
#[derive(Debug, Clone, Default)]
pub struct ValueCoercer {
    options: CoercionOptions,
}

impl ValueCoercer {
    /// Create a coercer with custom options
    pub fn new(options: CoercionOptions) -> Self {
        Self { options }
    }

    /// Get the options
    pub fn options(&self) -> &CoercionOptions {
        &self.options
    }

    /// Coerce a cell by its declared kind
    ///
    /// Errors only when the cell accessor itself fails.
    pub fn coerce<C: CellAccess + ?Sized>(&self, cell: &C) -> Result<CoercedValue> {
        match cell.kind() {
            CellKind::Formula => self.coerce_formula(cell),
            kind => {
                let raw = cell.raw_value()?;
                Ok(self.coerce_raw(kind, &raw, cell.is_date_formatted()))
            }
        }
    }

    /// Apply the rule for `kind` to an already-read raw value
    ///
    /// A `Formula` kind cannot be resolved without an evaluator and yields
    /// absent here; use [`ValueCoercer::coerce`] for formula cells.
    pub fn coerce_raw(&self, kind: CellKind, raw: &RawValue, date_formatted: bool) -> CoercedValue {
        match kind {
            CellKind::String => coerce_string(raw),
            CellKind::Numeric => self.coerce_numeric(raw, date_formatted),
            CellKind::Boolean => coerce_boolean(raw),
            CellKind::Formula | CellKind::Blank | CellKind::Error => CoercedValue::Absent,
        }
    }

    /// Coerce and render as text; `None` when absent
    pub fn as_text<C: CellAccess + ?Sized>(&self, cell: &C) -> Result<Option<String>> {
        let value = self.coerce(cell)?;
        Ok(match value {
            CoercedValue::Absent => None,
            other => Some(other.render(&self.options.date_format)),
        })
    }

    /// Read a cell as a number
    ///
    /// Date-formatted cells are not numbers for this purpose.
    pub fn as_number<C: CellAccess + ?Sized>(&self, cell: &C) -> Result<Option<Number>> {
        let number = match cell.kind() {
            CellKind::Numeric if cell.is_date_formatted() => None,
            CellKind::Numeric | CellKind::String => match cell.raw_value()? {
                RawValue::Number(n) => Some(Number::from_f64(n)),
                RawValue::Text(s) => parse_number(&s),
                _ => None,
            },
            CellKind::Formula => match cell.evaluate() {
                Ok(RawValue::Number(n)) => Some(Number::from_f64(n)),
                Ok(_) => None,
                Err(err) => {
                    tracing::debug!("{err}; no numeric value");
                    None
                }
            },
            _ => None,
        };
        Ok(number)
    }

    /// Read a cell as a boolean
    pub fn as_boolean<C: CellAccess + ?Sized>(&self, cell: &C) -> Result<Option<bool>> {
        let value = match cell.kind() {
            CellKind::Boolean | CellKind::String => cell.raw_value()?,
            CellKind::Formula => match cell.evaluate() {
                Ok(raw) => raw,
                Err(err) => {
                    tracing::debug!("{err}; no boolean value");
                    return Ok(None);
                }
            },
            _ => return Ok(None),
        };
        Ok(coerce_boolean(&value).as_bool())
    }

    /// Read a cell as a date; only date-formatted numbers qualify
    pub fn as_date<C: CellAccess + ?Sized>(&self, cell: &C) -> Result<Option<NaiveDateTime>> {
        if !cell.is_date_formatted() {
            return Ok(None);
        }
        let serial = match cell.kind() {
            CellKind::Numeric => match cell.raw_value()? {
                RawValue::Number(n) => Some(n),
                RawValue::Text(s) => parse_number(&s).map(|n| n.as_f64()),
                _ => None,
            },
            CellKind::Formula => match cell.evaluate() {
                Ok(RawValue::Number(n)) => Some(n),
                _ => None,
            },
            _ => None,
        };
        Ok(serial.and_then(|s| self.options.date_system.serial_to_datetime(s)))
    }

    /// Check whether a cell carries a usable value
    ///
    /// Defined through [`ValueCoercer::coerce`] so that presence and value
    /// checks can never disagree.
    pub fn is_usable<C: CellAccess + ?Sized>(&self, cell: &C) -> Result<bool> {
        Ok(self.coerce(cell)?.is_present())
    }

    fn coerce_numeric(&self, raw: &RawValue, date_formatted: bool) -> CoercedValue {
        let serial = match raw {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => match parse_number(s) {
                Some(number) if date_formatted => number.as_f64(),
                Some(number) => return CoercedValue::Number(number),
                None => return CoercedValue::Absent,
            },
            _ => return CoercedValue::Absent,
        };

        if date_formatted {
            self.options
                .date_system
                .serial_to_datetime(serial)
                .map_or(CoercedValue::Absent, CoercedValue::Date)
        } else {
            CoercedValue::Number(Number::from_f64(serial))
        }
    }

    fn coerce_formula<C: CellAccess + ?Sized>(&self, cell: &C) -> Result<CoercedValue> {
        match cell.evaluate() {
            Ok(result) => Ok(self.coerce_raw(result.kind(), &result, cell.is_date_formatted())),
            Err(err) => {
                let text = cell.formula()?.unwrap_or_default();
                tracing::warn!("{err}; falling back to formula text {text:?}");
                Ok(coerce_string(&RawValue::Text(text)))
            }
        }
    }
}

fn coerce_string(raw: &RawValue) -> CoercedValue {
    let text = match raw {
        RawValue::Text(s) => s.trim().to_string(),
        RawValue::Number(n) => Number::from_f64(*n).to_string(),
        RawValue::Boolean(b) => b.to_string(),
        RawValue::Blank | RawValue::Error(_) => String::new(),
    };
    if text.is_empty() {
        CoercedValue::Absent
    } else {
        CoercedValue::Text(text)
    }
}

fn coerce_boolean(raw: &RawValue) -> CoercedValue {
    match raw {
        RawValue::Boolean(b) => CoercedValue::Boolean(*b),
        RawValue::Text(s) => parse_boolean(s).map_or(CoercedValue::Absent, CoercedValue::Boolean),
        _ => CoercedValue::Absent,
    }
}

/// Parse boolean text: `true/yes/1` and `false/no/0`, case-insensitive, trimmed
pub fn parse_boolean(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Parse numeric text into its narrowest [`Number`]
///
/// Thousands separators and whitespace are stripped first. Plain and
/// scientific decimal notation are accepted and never rounded: digits beyond
/// what [`Decimal`] holds exactly land in [`Number::Big`]. Text that still
/// does not parse yields `None`.
pub fn parse_number(text: &str) -> Option<Number> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    // Only digits, sign, point and exponent are accepted, so "1_000", "inf"
    // and "NaN" stay unparseable.
    let numeric_only = !cleaned.is_empty()
        && cleaned
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !numeric_only {
        return None;
    }

    if let Ok(decimal) = Decimal::from_str_exact(&cleaned) {
        return Some(Number::from_decimal(decimal));
    }
    BigDecimal::from_str(&cleaned).ok().map(Number::from_big)
}
