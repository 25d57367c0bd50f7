//! Canonical projection of decoded JSON values.
//!
//! `serde_json::Value` equality distinguishes `1` from `1.0` and cannot be
//! hashed. `enum` and `uniqueItems` need JSON equality instead: numbers compare
//! by numeric value and object key order is irrelevant. `Canon` gives that,
//! with a total order and a hash so duplicates are found in one pass.
//!
//! Integral numbers (including integral floats such as `1.0`) are held
//! exactly as `i128`, so integers above 2^53 stay distinct.
use std::cmp::Ordering;
use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use serde_json::{Number, Value};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Canon {
    Null,
    Bool(bool),
    Int(i128),
    /// Non-integral (or out of `i128` range) numbers.
    Float(OrderedFloat<f64>),
    String(String),
    Array(Vec<Canon>),
    Object(BTreeMap<String, Canon>),
}

impl From<&Value> for Canon {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => Canon::Null,
            Value::Bool(b) => Canon::Bool(*b),
            Value::Number(n) => match as_i128(n) {
                Some(i) => Canon::Int(i),
                None => Canon::Float(OrderedFloat(n.as_f64().unwrap_or(f64::NAN))),
            },
            Value::String(s) => Canon::String(s.clone()),
            Value::Array(xs) => Canon::Array(xs.iter().map(Canon::from).collect()),
            Value::Object(m) => {
                Canon::Object(m.iter().map(|(k, v)| (k.clone(), Canon::from(v))).collect())
            }
        }
    }
}

/// JSON equality as used by `enum` and `uniqueItems`.
pub fn json_eq(a: &Value, b: &Value) -> bool {
    Canon::from(a) == Canon::from(b)
}

// Rounds to exactly 2^127; every f64 strictly inside it fits an i128.
const I128_BOUND: f64 = i128::MAX as f64;

/// The exact integer value of `n`, if it has one.
pub fn as_i128(n: &Number) -> Option<i128> {
    if let Some(i) = n.as_i64() {
        return Some(i128::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(i128::from(u));
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f.abs() < I128_BOUND).then_some(f as i128)
}

/// Numeric order of two JSON numbers, exact whenever one side is integral.
pub fn cmp_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    match (as_i128(a), as_i128(b)) {
        (Some(x), Some(y)) => Some(x.cmp(&y)),
        (Some(x), None) => cmp_int_float(x, b.as_f64()?),
        (None, Some(y)) => cmp_int_float(y, a.as_f64()?).map(Ordering::reverse),
        (None, None) => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

/// `f` is never integral within `i128` range here.
fn cmp_int_float(i: i128, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    if f.abs() >= I128_BOUND {
        return Some(if f > 0.0 { Ordering::Less } else { Ordering::Greater });
    }
    // fractional, so |f| < 2^52 and its floor converts exactly
    if i <= f.floor() as i128 { Some(Ordering::Less) } else { Some(Ordering::Greater) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integral_and_float_forms_are_equal() {
        assert!(json_eq(&json!(1), &json!(1.0)));
        assert!(json_eq(&json!([1, {"a": 2}]), &json!([1.0, {"a": 2.0}])));
        assert!(!json_eq(&json!(1), &json!(1.5)));
    }

    #[test]
    fn integers_beyond_f64_precision_stay_distinct() {
        assert!(!json_eq(&json!(9007199254740992u64), &json!(9007199254740993u64)));
        assert!(!json_eq(&json!(u64::MAX), &json!(u64::MAX - 1)));
        assert!(json_eq(&json!(9007199254740992u64), &json!(9007199254740992.0)));
        assert!(json_eq(&json!(-5), &json!(-5.0)));
    }

    #[test]
    fn numbers_order_exactly() {
        let n = |v: Value| match v {
            Value::Number(n) => n,
            other => panic!("not a number: {other}"),
        };
        assert_eq!(cmp_numbers(&n(json!(9007199254740993u64)), &n(json!(9007199254740992u64))), Some(Ordering::Greater));
        assert_eq!(cmp_numbers(&n(json!(2)), &n(json!(2.5))), Some(Ordering::Less));
        assert_eq!(cmp_numbers(&n(json!(3)), &n(json!(2.5))), Some(Ordering::Greater));
        assert_eq!(cmp_numbers(&n(json!(-3)), &n(json!(-2.5))), Some(Ordering::Less));
        assert_eq!(cmp_numbers(&n(json!(2.5)), &n(json!(3))), Some(Ordering::Less));
        assert_eq!(cmp_numbers(&n(json!(u64::MAX)), &n(json!(1e300))), Some(Ordering::Less));
        assert_eq!(cmp_numbers(&n(json!(1.5)), &n(json!(1.25))), Some(Ordering::Greater));
        assert_eq!(cmp_numbers(&n(json!(4)), &n(json!(4.0))), Some(Ordering::Equal));
    }

    #[test]
    fn object_key_order_is_irrelevant() {
        let a = serde_json::from_str::<Value>(r#"{"x":1,"y":2}"#).unwrap();
        let b = serde_json::from_str::<Value>(r#"{"y":2,"x":1}"#).unwrap();
        assert!(json_eq(&a, &b));
    }

    #[test]
    fn kinds_never_compare_equal() {
        assert!(!json_eq(&json!(0), &json!(false)));
        assert!(!json_eq(&json!(null), &json!(false)));
        assert!(!json_eq(&json!("1"), &json!(1)));
        assert!(!json_eq(&json!([1, 2]), &json!([2, 1])));
    }
}
