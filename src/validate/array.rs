use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde_json::Value;

use crate::canon::Canon;
use crate::error::{Violation, ViolationKind};
use crate::schema::{Additional, ArrayConstraints, Items};

use super::{Loc, Validator};

pub(super) fn check(v: &Validator<'_>, c: &ArrayConstraints, xs: &[Value], loc: &Loc, out: &mut Vec<Violation>) {
    if let Some(limit) = c.min_items {
        if (xs.len() as u64) < limit {
            out.push(loc.violation("minItems", ViolationKind::MinItems { limit, actual: xs.len() }));
        }
    }
    if let Some(limit) = c.max_items {
        if (xs.len() as u64) > limit {
            out.push(loc.violation("maxItems", ViolationKind::MaxItems { limit, actual: xs.len() }));
        }
    }

    if c.unique_items {
        let mut seen: HashMap<Canon, usize> = HashMap::with_capacity(xs.len());
        for (i, x) in xs.iter().enumerate() {
            match seen.entry(Canon::from(x)) {
                Entry::Occupied(e) => out.push(
                    loc.violation("uniqueItems", ViolationKind::UniqueItems { first: *e.get(), second: i }),
                ),
                Entry::Vacant(e) => {
                    e.insert(i);
                }
            }
        }
    }

    match &c.items {
        None => {}
        Some(Items::List(item)) => {
            let at = loc.keyword("items");
            for (i, x) in xs.iter().enumerate() {
                v.check(item, x, &at.element(i), out);
            }
        }
        Some(Items::Tuple(positional)) => {
            let at = loc.keyword("items");
            for (i, (x, s)) in xs.iter().zip(positional).enumerate() {
                v.check(s, x, &at.index(i).element(i), out);
            }
            if xs.len() > positional.len() {
                match &c.additional_items {
                    None | Some(Additional::Permit) => {}
                    Some(Additional::Forbid) => out.push(loc.violation(
                        "additionalItems",
                        ViolationKind::AdditionalItems { allowed: positional.len(), actual: xs.len() },
                    )),
                    Some(Additional::Schema(extra)) => {
                        let at = loc.keyword("additionalItems");
                        for (i, x) in xs.iter().enumerate().skip(positional.len()) {
                            v.check(extra, x, &at.element(i), out);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ViolationKind;
    use crate::schema::Schema;
    use serde_json::{Value, json};

    fn schema(doc: Value) -> Schema {
        Schema::from_value(&doc).unwrap()
    }

    #[test]
    fn length_bounds() {
        let s = schema(json!({ "minItems": 1, "maxItems": 2 }));
        assert!(!s.is_valid(&json!([])));
        assert!(s.is_valid(&json!([1, 2])));
        assert!(!s.is_valid(&json!([1, 2, 3])));
    }

    #[test]
    fn unique_items_uses_structural_equality() {
        let s = schema(json!({ "uniqueItems": true }));
        assert!(s.is_valid(&json!([1, "1", [1], { "a": 1 }])));
        let err = s.validate(&json!([{ "a": 1, "b": 2 }, 3, { "b": 2, "a": 1 }])).unwrap_err();
        assert_eq!(err.violations()[0].kind, ViolationKind::UniqueItems { first: 0, second: 2 });
        assert!(!s.is_valid(&json!([1, 1.0])));
    }

    #[test]
    fn unique_items_tells_large_integers_apart() {
        let s = schema(json!({ "uniqueItems": true }));
        assert!(s.is_valid(&json!([9007199254740992u64, 9007199254740993u64])));
        assert!(s.is_valid(&json!([u64::MAX, u64::MAX - 1, i64::MIN])));
        assert!(!s.is_valid(&json!([9007199254740993u64, 9007199254740993u64])));
    }

    #[test]
    fn list_items_apply_to_every_element() {
        let s = schema(json!({ "items": { "type": "string" } }));
        assert!(s.is_valid(&json!(["a", "b"])));
        let err = s.validate(&json!(["a", 2, "c", null])).unwrap_err();
        let at: Vec<&str> = err.violations().iter().map(|v| v.instance_path.as_str()).collect();
        assert_eq!(at, vec!["/1", "/3"]);
    }

    #[test]
    fn tuple_without_additional_items_rejects_extras() {
        let s = schema(json!({
            "items": [{ "type": "string" }, { "type": "integer" }],
            "additionalItems": false
        }));
        assert!(s.is_valid(&json!([])));
        assert!(s.is_valid(&json!(["a"])));
        assert!(s.is_valid(&json!(["a", 1])));
        assert!(!s.is_valid(&json!([1, "a"])));
        let err = s.validate(&json!(["a", 1, true])).unwrap_err();
        assert_eq!(err.violations()[0].kind, ViolationKind::AdditionalItems { allowed: 2, actual: 3 });
    }

    #[test]
    fn tuple_positions_report_their_schema_index() {
        let s = schema(json!({ "items": [{}, { "type": "integer" }] }));
        let err = s.validate(&json!(["x", "y", "z"])).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.violations()[0].schema_path, "/items/1/type");
        assert_eq!(err.violations()[0].instance_path, "/1");
    }

    #[test]
    fn additional_items_schema_covers_the_tail() {
        let s = schema(json!({ "items": [{ "type": "string" }], "additionalItems": { "type": "number" } }));
        assert!(s.is_valid(&json!(["a", 1, 2.5])));
        assert!(!s.is_valid(&json!(["a", 1, "b"])));
    }

    #[test]
    fn additional_items_is_ignored_for_list_items() {
        let s = schema(json!({ "items": { "type": "integer" }, "additionalItems": false }));
        assert!(s.is_valid(&json!([1, 2, 3, 4])));
    }
}
