//! Comparison predicate builders.
//!
//! Each builder captures a reference value and returns a [`Predicate`] that
//! compares its argument against it. Predicates plug directly into patterns:
//!
//! ```rust
//! use funkit::pattern;
//! use funkit::pattern::MatcherBuilder;
//! use funkit::predicate::{greater_than, less_than};
//! use funkit::value::Value;
//!
//! let sign = MatcherBuilder::new()
//!     .rule(pattern![less_than(0)], "negative")
//!     .rule(pattern![greater_than(0)], "positive")
//!     .rule(pattern![0], "zero")
//!     .build()?;
//!
//! assert_eq!(sign.call(&[Value::from(-2)])?, Value::from("negative"));
//! assert_eq!(sign.call(&[Value::from(0.0)])?, Value::from("zero"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Comparisons between unordered values (say a string and a number) are
//! `false` for every builder.

use crate::pattern::Predicate;
use crate::value::Value;

/// `less_than(a)(b) == (b < a)`.
pub fn less_than(bound: impl Into<Value>) -> Predicate {
    let bound = bound.into();
    Predicate::new(format!("less_than({bound})"), move |value| *value < bound)
}

/// `less_or_equal(a)(b) == (b <= a)`.
pub fn less_or_equal(bound: impl Into<Value>) -> Predicate {
    let bound = bound.into();
    Predicate::new(format!("less_or_equal({bound})"), move |value| {
        *value <= bound
    })
}

/// `equal_to(a)(b) == (b == a)`.
///
/// This is also the escape hatch for comparing a function or a sequence by
/// value inside a pattern, where it would otherwise be called or matched
/// structurally.
pub fn equal_to(expected: impl Into<Value>) -> Predicate {
    let expected = expected.into();
    Predicate::new(format!("equal_to({expected})"), move |value| {
        *value == expected
    })
}

/// `greater_or_equal(a)(b) == (b >= a)`.
pub fn greater_or_equal(bound: impl Into<Value>) -> Predicate {
    let bound = bound.into();
    Predicate::new(format!("greater_or_equal({bound})"), move |value| {
        *value >= bound
    })
}

/// `greater_than(a)(b) == (b > a)`.
pub fn greater_than(bound: impl Into<Value>) -> Predicate {
    let bound = bound.into();
    Predicate::new(format!("greater_than({bound})"), move |value| *value > bound)
}

/// `element_of(c)(e) == (e in c)`.
///
/// Membership means: an equal item for sequences, a substring for strings
/// and a key for mappings. Any other collection contains nothing.
pub fn element_of(collection: impl Into<Value>) -> Predicate {
    let collection = collection.into();
    Predicate::new(format!("element_of({collection})"), move |value| {
        match (&collection, value) {
            (Value::Seq(items), _) => items.contains(value),
            (Value::Str(text), Value::Str(needle)) => text.contains(&**needle),
            (Value::Map(entries), Value::Str(key)) => entries.contains_key(key),
            _ => false,
        }
    })
}

/// `negate(p)(x) == !p(x)`.
pub fn negate(predicate: Predicate) -> Predicate {
    predicate.negate()
}

/// Remainder of a number modulo two, with the sign of the divisor.
fn parity(value: &Value) -> Option<f64> {
    match value {
        Value::Int(n) => Some(if n.rem_euclid(2) == 0 { 0.0 } else { 1.0 }),
        Value::Float(number) => Some(number.rem_euclid(2.0)),
        _ => None,
    }
}

/// Matches even numbers; integral floats such as `4.0` count.
#[allow(clippy::float_cmp)]
pub fn even() -> Predicate {
    Predicate::new("even", |value| parity(value) == Some(0.0))
}

/// Matches odd numbers; integral floats such as `-3.0` count.
#[allow(clippy::float_cmp)]
pub fn odd() -> Predicate {
    Predicate::new("odd", |value| parity(value) == Some(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(less_than(5), Value::from(4), true)]
    #[case(less_than(5), Value::from(5), false)]
    #[case(less_or_equal(5), Value::from(5.0), true)]
    #[case(equal_to("a"), Value::from("a"), true)]
    #[case(equal_to(1), Value::from(1.0), true)]
    #[case(greater_or_equal(5), Value::from(4), false)]
    #[case(greater_than("a"), Value::from("b"), true)]
    #[case(greater_than(1), Value::from("2"), false)]
    #[case(less_than(1), Value::from("0"), false)]
    fn test_comparisons(
        #[case] predicate: Predicate,
        #[case] value: Value,
        #[case] expected: bool,
    ) {
        assert_eq!(predicate.test(&value), expected);
    }

    #[rstest]
    #[case(Value::seq([Value::from(1), Value::from(2)]), Value::from(2), true)]
    #[case(Value::seq([Value::from(1), Value::from(2)]), Value::from(3), false)]
    #[case(Value::from("hello"), Value::from("ell"), true)]
    #[case(Value::from("hello"), Value::from(1), false)]
    #[case(Value::map([("k", Value::Unit)]), Value::from("k"), true)]
    #[case(Value::from(12), Value::from(1), false)]
    fn test_element_of(#[case] collection: Value, #[case] value: Value, #[case] expected: bool) {
        assert_eq!(element_of(collection).test(&value), expected);
    }

    #[rstest]
    fn test_negate_and_parity() {
        assert!(negate(even()).test(&Value::from(3)));
        assert!(odd().test(&Value::from(-3)));
        assert!(!odd().test(&Value::from(2)));
    }

    #[rstest]
    #[case(Value::from(2.0), true, false)]
    #[case(Value::from(-3.0), false, true)]
    #[case(Value::from(1e20), true, false)]
    #[case(Value::from(2.5), false, false)]
    #[case(Value::Float(f64::INFINITY), false, false)]
    #[case(Value::Float(f64::NAN), false, false)]
    #[case(Value::from(true), false, false)]
    #[case(Value::from(i64::MIN), true, false)]
    fn test_parity_of_numbers(#[case] value: Value, #[case] is_even: bool, #[case] is_odd: bool) {
        assert_eq!(even().test(&value), is_even);
        assert_eq!(odd().test(&value), is_odd);
    }

    #[rstest]
    fn test_names_describe_bound() {
        assert_eq!(less_than(3).name(), "less_than(3)");
        assert_eq!(negate(equal_to("x")).name(), r#"not equal_to("x")"#);
    }
}
