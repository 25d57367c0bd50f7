use std::cmp::Ordering;

use serde_json::Number;

use crate::canon::{as_i128, cmp_numbers};
use crate::error::{Violation, ViolationKind};
use crate::schema::NumberConstraints;

use super::Loc;

pub(super) fn check(c: &NumberConstraints, n: &Number, loc: &Loc, out: &mut Vec<Violation>) {
    if let Some(b) = &c.minimum {
        let ok = match cmp_numbers(n, &b.limit) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => !b.exclusive,
            _ => false,
        };
        if !ok {
            out.push(loc.violation(
                "minimum",
                ViolationKind::Minimum { limit: b.limit.clone(), exclusive: b.exclusive, actual: n.clone() },
            ));
        }
    }
    if let Some(b) = &c.maximum {
        let ok = match cmp_numbers(n, &b.limit) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => !b.exclusive,
            _ => false,
        };
        if !ok {
            out.push(loc.violation(
                "maximum",
                ViolationKind::Maximum { limit: b.limit.clone(), exclusive: b.exclusive, actual: n.clone() },
            ));
        }
    }
    if let Some(divisor) = &c.multiple_of {
        if !is_multiple_of(n, divisor) {
            out.push(loc.violation(
                "multipleOf",
                ViolationKind::MultipleOf { divisor: divisor.clone(), actual: n.clone() },
            ));
        }
    }
}

/// Exact when both sides are integral; tolerant of binary rounding for
/// decimals like `0.1`.
fn is_multiple_of(n: &Number, divisor: &Number) -> bool {
    if let (Some(i), Some(d)) = (as_i128(n), as_i128(divisor)) {
        return d != 0 && i % d == 0;
    }
    let (Some(x), Some(d)) = (n.as_f64(), divisor.as_f64()) else { return false };
    let q = x / d;
    if !q.is_finite() {
        return false;
    }
    (q - q.round()).abs() <= 1e-9 * q.abs().max(1.0)
}
