//! Property tests for the numeric tiers and boolean text rule

use cellwise_core::{CellKind, CoercedValue, Number, RawValue, ValueCoercer};
use proptest::prelude::*;

fn coerce_numeric(value: f64) -> CoercedValue {
    ValueCoercer::default().coerce_raw(CellKind::Numeric, &RawValue::Number(value), false)
}

proptest! {
    /// Whole numbers inside the 32-bit range always come back as `Int`
    #[test]
    fn whole_i32_values_are_int(n in any::<i32>()) {
        prop_assert_eq!(coerce_numeric(n as f64), CoercedValue::Number(Number::Int(n)));
    }

    /// Whole numbers inside the 64-bit range are integers, never decimals
    #[test]
    fn whole_i64_values_are_integers(n in -(1i64 << 53)..(1i64 << 53)) {
        match coerce_numeric(n as f64) {
            CoercedValue::Number(Number::Int(v)) => prop_assert_eq!(v as i64, n),
            CoercedValue::Number(Number::Long(v)) => prop_assert_eq!(v, n),
            other => prop_assert!(false, "expected an integer tier, got {:?}", other),
        }
    }

    /// Fractional values become decimals without trailing zeros
    #[test]
    fn fractional_values_are_stripped_decimals(whole in -1_000_000i64..1_000_000, cents in 1u32..100) {
        let value = whole as f64 + f64::from(cents) / 100.0 * if whole < 0 { -1.0 } else { 1.0 };
        prop_assume!(value.fract() != 0.0);
        match coerce_numeric(value) {
            CoercedValue::Number(Number::Decimal(d)) => {
                let text = d.to_string();
                prop_assert!(!text.ends_with('0'), "trailing zero in {}", text);
                prop_assert!(!text.ends_with('.'));
            }
            other => prop_assert!(false, "expected a decimal, got {:?}", other),
        }
    }

    /// Only the six boolean words are booleans, in any casing and padding
    #[test]
    fn boolean_text_rule(text in "[ ]{0,2}[a-zA-Z01]{1,6}[ ]{0,2}") {
        let coercer = ValueCoercer::default();
        let value = coercer.coerce_raw(CellKind::Boolean, &RawValue::text(text.clone()), false);
        let expected = match text.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => CoercedValue::Boolean(true),
            "false" | "no" | "0" => CoercedValue::Boolean(false),
            _ => CoercedValue::Absent,
        };
        prop_assert_eq!(value, expected);
    }
}

#[test]
fn values_beyond_i64_are_decimals() {
    match coerce_numeric(1.5e19) {
        CoercedValue::Number(Number::Decimal(d)) => assert_eq!(d.to_string(), "15000000000000000000"),
        other => panic!("expected a decimal, got {other:?}"),
    }
}

#[test]
fn decimal_keeps_small_fraction() {
    assert_eq!(coerce_numeric(12.5).to_string(), "12.5");
    assert_eq!(coerce_numeric(-0.25).to_string(), "-0.25");
}

#[test]
fn numeric_text_keeps_every_digit() {
    let coercer = ValueCoercer::default();
    let coerce = |text: &str| coercer.coerce_raw(CellKind::Numeric, &RawValue::text(text), false);

    let wide = coerce("123456789012345678901234567890");
    assert!(matches!(wide, CoercedValue::Number(Number::Big(_))));
    assert_eq!(wide.to_string(), "123456789012345678901234567890");

    let tiny = coerce("0.00000000000000000000000000000001");
    match &tiny {
        CoercedValue::Number(n @ Number::Big(_)) => assert!(!n.is_integral()),
        other => panic!("expected an arbitrary-precision decimal, got {other:?}"),
    }
    assert_eq!(tiny.to_string(), "0.00000000000000000000000000000001");

    assert_eq!(coerce("1_000"), CoercedValue::Absent);
}
