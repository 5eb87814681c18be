//! Typed conversion of document nodes
//!
//! Scalars are presented to the [`ValueCoercer`] as cells, so a document
//! value converts exactly like a spreadsheet cell holding the same data:
//! `"42"` reads as an integer, `"yes"` as a boolean, and `"abc"` as neither.
//! JSON numbers keep their source text, so large integers are not routed
//! through `f64`.

use cellwise_core::{CellAccess, CellKind, CoercedValue, Number, RawValue, Result, ValueCoercer};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::Value;

/// A document node seen as a cell
#[derive(Debug, Clone, Copy)]
pub struct JsonNode<'a>(pub &'a Value);

impl CellAccess for JsonNode<'_> {
    fn kind(&self) -> CellKind {
        match self.0 {
            Value::String(_) => CellKind::String,
            Value::Number(_) => CellKind::Numeric,
            Value::Bool(_) => CellKind::Boolean,
            Value::Null | Value::Array(_) | Value::Object(_) => CellKind::Blank,
        }
    }

    fn raw_value(&self) -> Result<RawValue> {
        Ok(match self.0 {
            Value::String(s) => RawValue::Text(s.clone()),
            Value::Number(n) => RawValue::Text(n.to_string()),
            Value::Bool(b) => RawValue::Boolean(*b),
            Value::Null | Value::Array(_) | Value::Object(_) => RawValue::Blank,
        })
    }
}

/// Types a document node can be read as
pub trait FromNode: Sized {
    /// Name used in missing-value errors
    const KIND: &'static str;

    /// Convert a node; `None` when it holds no usable value of this type
    fn from_node(node: &Value, coercer: &ValueCoercer) -> Result<Option<Self>>;
}

impl FromNode for CoercedValue {
    const KIND: &'static str = "any";

    fn from_node(node: &Value, coercer: &ValueCoercer) -> Result<Option<Self>> {
        Ok(coercer.coerce(&JsonNode(node))?.into_option())
    }
}

impl FromNode for String {
    const KIND: &'static str = "String";

    fn from_node(node: &Value, coercer: &ValueCoercer) -> Result<Option<Self>> {
        coercer.as_text(&JsonNode(node))
    }
}

impl FromNode for Number {
    const KIND: &'static str = "number";

    fn from_node(node: &Value, coercer: &ValueCoercer) -> Result<Option<Self>> {
        coercer.as_number(&JsonNode(node))
    }
}

impl FromNode for i32 {
    const KIND: &'static str = "int";

    fn from_node(node: &Value, coercer: &ValueCoercer) -> Result<Option<Self>> {
        Ok(coercer.as_number(&JsonNode(node))?.and_then(|n| n.as_i32()))
    }
}

impl FromNode for i64 {
    const KIND: &'static str = "long";

    fn from_node(node: &Value, coercer: &ValueCoercer) -> Result<Option<Self>> {
        Ok(coercer.as_number(&JsonNode(node))?.and_then(|n| n.as_i64()))
    }
}

impl FromNode for f64 {
    const KIND: &'static str = "double";

    fn from_node(node: &Value, coercer: &ValueCoercer) -> Result<Option<Self>> {
        Ok(coercer.as_number(&JsonNode(node))?.map(|n| n.as_f64()))
    }
}

impl FromNode for Decimal {
    const KIND: &'static str = "decimal";

    fn from_node(node: &Value, coercer: &ValueCoercer) -> Result<Option<Self>> {
        Ok(coercer.as_number(&JsonNode(node))?.and_then(|n| n.as_decimal()))
    }
}

impl FromNode for bool {
    const KIND: &'static str = "boolean";

    fn from_node(node: &Value, coercer: &ValueCoercer) -> Result<Option<Self>> {
        coercer.as_boolean(&JsonNode(node))
    }
}

impl FromNode for NaiveDateTime {
    const KIND: &'static str = "date";

    fn from_node(node: &Value, coercer: &ValueCoercer) -> Result<Option<Self>> {
        let Some(text) = node.as_str().map(str::trim) else {
            return Ok(None);
        };
        let format = coercer.options().date_format.as_str();
        Ok(NaiveDateTime::parse_from_str(text, format)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(text, format)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            }))
    }
}

impl FromNode for NaiveDate {
    const KIND: &'static str = "date";

    fn from_node(node: &Value, coercer: &ValueCoercer) -> Result<Option<Self>> {
        Ok(NaiveDateTime::from_node(node, coercer)?.map(|dt| dt.date()))
    }
}
