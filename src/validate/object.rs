use serde_json::{Map, Value};

use crate::error::{Violation, ViolationKind};
use crate::schema::{Additional, Dependency, ObjectConstraints};

use super::{Loc, Validator};

/// `whole` is the object itself, needed by schema dependencies.
pub(super) fn check(
    v: &Validator<'_>,
    c: &ObjectConstraints,
    whole: &Value,
    map: &Map<String, Value>,
    loc: &Loc,
    out: &mut Vec<Violation>,
) {
    if let Some(limit) = c.min_properties {
        if (map.len() as u64) < limit {
            out.push(loc.violation("minProperties", ViolationKind::MinProperties { limit, actual: map.len() }));
        }
    }
    if let Some(limit) = c.max_properties {
        if (map.len() as u64) > limit {
            out.push(loc.violation("maxProperties", ViolationKind::MaxProperties { limit, actual: map.len() }));
        }
    }

    for name in &c.required {
        if !map.contains_key(name) {
            out.push(loc.violation("required", ViolationKind::Required { property: name.clone() }));
        }
    }

    for (key, x) in map {
        let mut covered = false;

        if let Some(s) = c.properties.get(key) {
            covered = true;
            v.check(s, x, &loc.keyword("properties").keyword(key).member(key), out);
        }

        for (pattern, s) in &c.pattern_properties {
            if pattern.is_match(key) {
                covered = true;
                v.check(s, x, &loc.keyword("patternProperties").keyword(pattern.as_str()).member(key), out);
            }
        }

        if !covered {
            match &c.additional_properties {
                None | Some(Additional::Permit) => {}
                Some(Additional::Forbid) => out.push(
                    loc.violation("additionalProperties", ViolationKind::AdditionalProperty { property: key.clone() }),
                ),
                Some(Additional::Schema(s)) => {
                    v.check(s, x, &loc.keyword("additionalProperties").member(key), out);
                }
            }
        }
    }

    for (name, dep) in &c.dependencies {
        if !map.contains_key(name) {
            continue;
        }
        let at = loc.keyword("dependencies");
        match dep {
            Dependency::Properties(names) => {
                for missing in names.iter().filter(|n| !map.contains_key(n.as_str())) {
                    out.push(at.violation(name, ViolationKind::Dependency {
                        property: name.clone(),
                        missing: missing.clone(),
                    }));
                }
            }
            Dependency::Schema(s) => v.check(s, whole, &at.keyword(name), out),
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
    fn required_names_every_missing_property() {
        let s = schema(json!({ "required": ["a", "b", "c"] }));
        let err = s.validate(&json!({ "b": null })).unwrap_err();
        let missing: Vec<ViolationKind> = err.into_violations().into_iter().map(|v| v.kind).collect();
        assert_eq!(missing, vec![
            ViolationKind::Required { property: "a".into() },
            ViolationKind::Required { property: "c".into() },
        ]);
    }

    #[test]
    fn absent_optional_properties_never_fail() {
        let s = schema(json!({
            "properties": { "a": { "type": "string" } },
            "patternProperties": { "^n_": { "type": "number" } }
        }));
        assert!(s.is_valid(&json!({})));
        assert!(s.is_valid(&json!({ "other": [] })));
    }

    #[test]
    fn pattern_properties_apply_alongside_properties() {
        let s = schema(json!({
            "properties": { "s_name": { "type": "string" } },
            "patternProperties": { "^s_": { "maxLength": 3 }, "name$": { "minLength": 2 } }
        }));
        assert!(s.is_valid(&json!({ "s_name": "ab" })));
        let err = s.validate(&json!({ "s_name": "a" })).unwrap_err();
        assert_eq!(err.violations()[0].schema_path, "/patternProperties/name$/minLength");
        let err = s.validate(&json!({ "s_name": "abcd" })).unwrap_err();
        assert_eq!(err.violations()[0].schema_path, "/patternProperties/^s_/maxLength");
        assert!(!s.is_valid(&json!({ "s_x": "long!" })));
    }

    #[test]
    fn additional_properties_only_see_uncovered_names() {
        let forbid = schema(json!({
            "properties": { "a": {} },
            "patternProperties": { "^x-": {} },
            "additionalProperties": false
        }));
        assert!(forbid.is_valid(&json!({ "a": 1, "x-b": 2 })));
        let err = forbid.validate(&json!({ "a": 1, "b": 2 })).unwrap_err();
        assert_eq!(err.violations()[0].kind, ViolationKind::AdditionalProperty { property: "b".into() });

        let typed = schema(json!({ "properties": { "a": {} }, "additionalProperties": { "type": "integer" } }));
        assert!(typed.is_valid(&json!({ "a": "x", "b": 2 })));
        assert!(!typed.is_valid(&json!({ "a": "x", "b": "y" })));
    }

    #[test]
    fn property_dependencies_require_companions() {
        let s = schema(json!({ "dependencies": { "credit_card": ["billing_address"] } }));
        assert!(s.is_valid(&json!({ "name": "x" })));
        assert!(s.is_valid(&json!({ "credit_card": 1, "billing_address": "y" })));
        let err = s.validate(&json!({ "credit_card": 1 })).unwrap_err();
        assert_eq!(err.violations()[0].schema_path, "/dependencies/credit_card");
    }

    #[test]
    fn schema_dependencies_validate_the_whole_object() {
        let s = schema(json!({
            "dependencies": { "credit_card": { "required": ["billing_address"], "properties": { "billing_address": { "type": "string" } } } }
        }));
        assert!(s.is_valid(&json!({ "billing_address": 3 })));
        assert!(s.is_valid(&json!({ "credit_card": 1, "billing_address": "y" })));
        assert!(!s.is_valid(&json!({ "credit_card": 1 })));
        assert!(!s.is_valid(&json!({ "credit_card": 1, "billing_address": 3 })));
    }

    #[test]
    fn property_count_bounds() {
        let s = schema(json!({ "minProperties": 1, "maxProperties": 2 }));
        assert!(!s.is_valid(&json!({})));
        assert!(s.is_valid(&json!({ "a": 1, "b": 2 })));
        assert!(!s.is_valid(&json!({ "a": 1, "b": 2, "c": 3 })));
    }
}
