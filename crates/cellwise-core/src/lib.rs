//! # cellwise-core
//!
//! Core value model and coercion engine for the cellwise data-access layer.
//!
//! This crate provides the fundamental types used throughout cellwise:
//! - [`CoercedValue`] and [`Number`] - the typed result of coercing an untyped value
//! - [`CellAccess`], [`CellKind`] and [`RawValue`] - the boundary with the storage layer
//! - [`ValueCoercer`] - type inference and fallback rules for a single cell
//!
//! ## Example
//!
//! ```rust
//! use cellwise_core::{CellKind, CoercedValue, Number, RawValue, ValueCoercer};
//!
//! let coercer = ValueCoercer::default();
//!
//! let value = coercer.coerce_raw(CellKind::Numeric, &RawValue::Number(42.0), false);
//! assert_eq!(value, CoercedValue::Number(Number::Int(42)));
//!
//! let value = coercer.coerce_raw(CellKind::Boolean, &RawValue::text(" Yes "), false);
//! assert_eq!(value, CoercedValue::Boolean(true));
//! ```

pub mod cell;
pub mod coerce;
pub mod date;
pub mod error;
pub mod value;

pub use cell::{CellAccess, CellKind, ErrorCode, EvaluationError, RawValue};
pub use coerce::{parse_boolean, parse_number, CoercionOptions, ValueCoercer};
pub use date::DateSystem;
pub use error::{Error, Result};
pub use value::{CoercedValue, Number};

/// Default display format for dates rendered as text
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
