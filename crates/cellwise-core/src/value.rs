//! Coerced value types

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::DEFAULT_DATE_FORMAT;

/// A number in its narrowest lossless representation
///
/// Whole numbers that fit 32 bits are [`Number::Int`], wider whole numbers
/// that fit 64 bits are [`Number::Long`]. Anything else that `rust_decimal`
/// holds exactly (28 significant digits) is a [`Number::Decimal`], and the
/// rest is a [`Number::Big`]. Both decimal tiers have trailing zeros stripped.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Number {
    /// Whole number within the 32-bit signed range
    Int(i32),
    /// Whole number within the 64-bit signed range
    Long(i64),
    /// Fraction, or whole number beyond 64 bits, within 28 significant digits
    Decimal(Decimal),
    /// Arbitrary-precision value beyond what [`Number::Decimal`] holds exactly
    Big(BigDecimal),
    /// Non-finite double
    Float(f64),
}

/// 2^63 as a double; `i64::MAX as f64` rounds up to this value
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

impl Number {
    /// Tier a double into its narrowest representation
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Number::Float(value);
        }
        if value.fract() == 0.0 {
            if value >= i32::MIN as f64 && value <= i32::MAX as f64 {
                return Number::Int(value as i32);
            }
            if value >= -I64_BOUND && value < I64_BOUND {
                return Number::Long(value as i64);
            }
        }
        // Display gives the shortest round-trip digits in plain notation,
        // which keeps 0.1 as 0.1 instead of its full binary expansion.
        let text = value.to_string();
        if let Ok(decimal) = Decimal::from_str_exact(&text) {
            return Number::from_decimal(decimal);
        }
        match BigDecimal::from_str(&text) {
            Ok(big) => Number::from_big(big),
            Err(_) => Number::Float(value),
        }
    }

    /// Tier a decimal into its narrowest representation
    pub fn from_decimal(value: Decimal) -> Self {
        let value = value.normalize();
        if value.fract().is_zero() {
            if let Some(n) = value.to_i32() {
                return Number::Int(n);
            }
            if let Some(n) = value.to_i64() {
                return Number::Long(n);
            }
        }
        Number::Decimal(value)
    }

    /// Tier an arbitrary-precision decimal into its narrowest representation
    pub fn from_big(value: BigDecimal) -> Self {
        let value = value.normalized();
        if value.is_integer() {
            if let Some(n) = value.to_i64() {
                return Number::from(n);
            }
        }
        match Decimal::from_str_exact(&value.to_plain_string()) {
            Ok(decimal) => Number::from_decimal(decimal),
            Err(_) => Number::Big(value),
        }
    }

    /// Check if the number has no fractional part
    pub fn is_integral(&self) -> bool {
        match self {
            Number::Int(_) | Number::Long(_) => true,
            Number::Decimal(d) => d.fract().is_zero(),
            Number::Big(b) => b.is_integer(),
            Number::Float(f) => f.is_finite() && f.fract() == 0.0,
        }
    }

    /// Get the value as a double (may lose precision)
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(n) => *n as f64,
            Number::Long(n) => *n as f64,
            Number::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
            Number::Big(b) => b.to_f64().unwrap_or(f64::NAN),
            Number::Float(f) => *f,
        }
    }

    /// Get the value as a 64-bit integer, if it is whole and in range
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int(n) => Some(*n as i64),
            Number::Long(n) => Some(*n),
            Number::Decimal(d) if d.fract().is_zero() => d.to_i64(),
            Number::Big(b) if b.is_integer() => b.to_i64(),
            Number::Float(f) if f.is_finite() && f.fract() == 0.0 => {
                if *f >= -I64_BOUND && *f < I64_BOUND {
                    Some(*f as i64)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Get the value as a 32-bit integer, if it is whole and in range
    pub fn as_i32(&self) -> Option<i32> {
        self.as_i64().and_then(|n| i32::try_from(n).ok())
    }

    /// Get the value as a decimal, if representable without rounding
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Number::Int(n) => Some(Decimal::from(*n)),
            Number::Long(n) => Some(Decimal::from(*n)),
            Number::Decimal(d) => Some(*d),
            Number::Big(_) | Number::Float(_) => None,
        }
    }

    /// Get the value as an arbitrary-precision decimal; `None` when non-finite
    pub fn as_big_decimal(&self) -> Option<BigDecimal> {
        match self {
            Number::Int(n) => Some(BigDecimal::from(*n)),
            Number::Long(n) => Some(BigDecimal::from(*n)),
            Number::Decimal(d) => BigDecimal::from_str(&d.to_string()).ok(),
            Number::Big(b) => Some(b.clone()),
            Number::Float(_) => None,
        }
    }

    /// Re-tier a number so whole values use the integer variants
    pub fn normalized(self) -> Self {
        match self {
            Number::Decimal(d) => Number::from_decimal(d),
            Number::Big(b) => Number::from_big(b),
            Number::Float(f) => Number::from_f64(f),
            other => other,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            Number::Long(n) => write!(f, "{}", n),
            Number::Decimal(d) => write!(f, "{}", d),
            Number::Big(b) => f.write_str(&b.to_plain_string()),
            Number::Float(n) => write!(f, "{}", n),
        }
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::Int(n)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        match i32::try_from(n) {
            Ok(n) => Number::Int(n),
            Err(_) => Number::Long(n),
        }
    }
}

impl From<Decimal> for Number {
    fn from(d: Decimal) -> Self {
        Number::from_decimal(d)
    }
}

impl From<BigDecimal> for Number {
    fn from(b: BigDecimal) -> Self {
        Number::from_big(b)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::from_f64(n)
    }
}

/// The typed result of coercing one untyped cell or node
///
/// `Absent` means "no usable value". It is distinct from empty text and must
/// never be read as zero or false.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoercedValue {
    /// Trimmed, non-empty text
    Text(String),
    /// Tiered number
    Number(Number),
    /// Boolean
    Boolean(bool),
    /// Calendar date (with time of day, midnight for pure dates)
    Date(NaiveDateTime),
    /// No usable value
    #[default]
    Absent,
}

impl CoercedValue {
    /// Create a text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CoercedValue::Text(s.into())
    }

    /// Check if there is no usable value
    pub fn is_absent(&self) -> bool {
        matches!(self, CoercedValue::Absent)
    }

    /// Check if there is a usable value
    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    /// Try to get the value as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CoercedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            CoercedValue::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Try to get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CoercedValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a date
    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            CoercedValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Convert to `None` when absent
    pub fn into_option(self) -> Option<CoercedValue> {
        match self {
            CoercedValue::Absent => None,
            other => Some(other),
        }
    }

    /// Render the value as text using a `chrono` date format
    pub fn render(&self, date_format: &str) -> String {
        match self {
            CoercedValue::Date(d) => d.format(date_format).to_string(),
            other => other.to_string(),
        }
    }

    /// Get the type name for messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CoercedValue::Text(_) => "text",
            CoercedValue::Number(_) => "number",
            CoercedValue::Boolean(_) => "boolean",
            CoercedValue::Date(_) => "date",
            CoercedValue::Absent => "absent",
        }
    }
}

impl fmt::Display for CoercedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercedValue::Text(s) => f.write_str(s),
            CoercedValue::Number(n) => write!(f, "{}", n),
            CoercedValue::Boolean(b) => write!(f, "{}", b),
            CoercedValue::Date(d) => {
                if d.time() == NaiveTime::MIN {
                    write!(f, "{}", d.format(DEFAULT_DATE_FORMAT))
                } else if d.nanosecond() == 0 {
                    write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S"))
                } else {
                    write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S%.3f"))
                }
            }
            CoercedValue::Absent => Ok(()),
        }
    }
}

impl From<Number> for CoercedValue {
    fn from(n: Number) -> Self {
        CoercedValue::Number(n)
    }
}

impl From<i32> for CoercedValue {
    fn from(n: i32) -> Self {
        CoercedValue::Number(Number::Int(n))
    }
}

impl From<i64> for CoercedValue {
    fn from(n: i64) -> Self {
        CoercedValue::Number(Number::from(n))
    }
}

impl From<Decimal> for CoercedValue {
    fn from(d: Decimal) -> Self {
        CoercedValue::Number(Number::from_decimal(d))
    }
}

impl From<bool> for CoercedValue {
    fn from(b: bool) -> Self {
        CoercedValue::Boolean(b)
    }
}

impl From<&str> for CoercedValue {
    fn from(s: &str) -> Self {
        CoercedValue::text(s)
    }
}

impl From<String> for CoercedValue {
    fn from(s: String) -> Self {
        CoercedValue::Text(s)
    }
}

impl From<NaiveDateTime> for CoercedValue {
    fn from(d: NaiveDateTime) -> Self {
        CoercedValue::Date(d)
    }
}

impl From<NaiveDate> for CoercedValue {
    fn from(d: NaiveDate) -> Self {
        CoercedValue::Date(d.and_time(NaiveTime::MIN))
    }
}

impl<T: Into<CoercedValue>> From<Option<T>> for CoercedValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CoercedValue::Absent, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_tiers_from_f64() {
        assert_eq!(Number::from_f64(2.0), Number::Int(2));
        assert_eq!(Number::from_f64(-2147483648.0), Number::Int(i32::MIN));
        assert_eq!(Number::from_f64(2147483648.0), Number::Long(2147483648));
        assert_eq!(Number::from_f64(12.5), Number::Decimal(dec("12.5")));
        assert_eq!(Number::from_f64(0.1), Number::Decimal(dec("0.1")));
    }

    #[test]
    fn test_beyond_i64_is_decimal() {
        let n = Number::from_f64(1e20);
        assert_eq!(n, Number::Decimal(dec("100000000000000000000")));
        assert!(n.is_integral());
        assert_eq!(n.as_i64(), None);
    }

    #[test]
    fn test_beyond_decimal_range_is_big() {
        let n = Number::from_f64(1e30);
        assert_eq!(n, Number::Big(BigDecimal::from_str("1e30").unwrap()));
        assert!(n.is_integral());
        assert_eq!(n.to_string(), "1000000000000000000000000000000");
        assert!(matches!(Number::from_f64(f64::NAN), Number::Float(_)));
        assert!(matches!(Number::from_f64(f64::INFINITY), Number::Float(_)));
    }

    #[test]
    fn test_tiny_fraction_is_big_not_rounded() {
        let n = Number::from_f64(1.5e-30);
        assert_eq!(n, Number::Big(BigDecimal::from_str("0.0000000000000000000000000000015").unwrap()));
        assert!(!n.is_integral());
        assert_eq!(n.as_decimal(), None);
    }

    #[test]
    fn test_from_big_narrows() {
        let big = |s: &str| BigDecimal::from_str(s).unwrap();
        assert_eq!(Number::from_big(big("42.000")), Number::Int(42));
        assert_eq!(Number::from_big(big("9223372036854775807")), Number::Long(i64::MAX));
        assert_eq!(Number::from_big(big("12.50")), Number::Decimal(dec("12.5")));
        assert_eq!(
            Number::from_big(big("123456789012345678901234567890")).as_big_decimal(),
            Some(big("123456789012345678901234567890"))
        );
    }

    #[test]
    fn test_from_decimal_strips_trailing_zeros() {
        let n = Number::from_decimal(dec("12.500"));
        assert_eq!(n.to_string(), "12.5");
        assert_eq!(Number::from_decimal(dec("7.000")), Number::Int(7));
    }

    #[test]
    fn test_coerced_value_display() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(CoercedValue::from(date).to_string(), "2024-03-09");
        assert_eq!(CoercedValue::from(true).to_string(), "true");
        assert_eq!(CoercedValue::Absent.to_string(), "");
        assert_eq!(CoercedValue::from(42).to_string(), "42");
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(CoercedValue::from(None::<i32>), CoercedValue::Absent);
        assert_eq!(CoercedValue::from(Some("x")), CoercedValue::text("x"));
        assert_eq!(CoercedValue::from(5).into_option(), Some(CoercedValue::from(5)));
    }
}
