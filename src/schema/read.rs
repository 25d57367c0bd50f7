//! Decoded document → [`Schema`].
//!
//! Every recognized keyword is shape-checked; anything else lands in
//! `extras` untouched. Errors point at the offending keyword with a
//! `#`-rooted JSON pointer.
use std::io;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};
use tracing::trace;

use super::{
    Additional, Bound, Dependency, Items, Pattern, PrimitiveType, PrimitiveTypes, Schema,
};
use crate::error::SchemaFormatError;
use crate::pointer;

type Result<T> = std::result::Result<T, SchemaFormatError>;

impl Schema {
    /// Build a schema from an already-decoded document.
    pub fn from_value(doc: &Value) -> Result<Self> {
        read_schema(doc, "#")
    }

    /// Decode JSON text from `reader` and build a schema from it.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let doc: Value = serde_json::from_reader(reader)?;
        Self::from_value(&doc)
    }
}

impl FromStr for Schema {
    type Err = SchemaFormatError;

    fn from_str(src: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(src)?;
        Self::from_value(&doc)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let doc = Value::deserialize(deserializer)?;
        Schema::from_value(&doc).map_err(serde::de::Error::custom)
    }
}

// ------------------------------- Reader ---------------------------------- //

fn read_schema(doc: &Value, at: &str) -> Result<Schema> {
    let Value::Object(map) = doc else {
        return Err(SchemaFormatError::NotAnObject { at: at.to_string() });
    };

    let mut s = Schema::default();
    let mut minimum = None;
    let mut maximum = None;
    let mut exclusive_minimum = None;
    let mut exclusive_maximum = None;

    for (key, value) in map {
        let here = pointer::push(at, key);
        match key.as_str() {
            "id" => s.id = Some(expect_str(value, &here)?.to_string()),
            "$schema" => s.schema_uri = Some(expect_str(value, &here)?.to_string()),
            "$ref" => s.reference = Some(expect_str(value, &here)?.to_string()),
            "title" => s.title = Some(expect_str(value, &here)?.to_string()),
            "description" => s.description = Some(expect_str(value, &here)?.to_string()),
            "default" => s.default = Some(value.clone()),

            "type" => s.types = read_types(value, &here)?,
            "format" => s.format = Some(expect_str(value, &here)?.to_string()),
            "enum" => s.enumeration = Some(expect_array(value, &here, "an array of values")?.clone()),

            "allOf" => s.all_of = read_schema_list(value, &here)?,
            "anyOf" => s.any_of = read_schema_list(value, &here)?,
            "oneOf" => s.one_of = read_schema_list(value, &here)?,
            "not" => s.not = Some(Box::new(read_schema(value, &here)?)),
            "definitions" => s.definitions = read_schema_map(value, &here)?,

            "minLength" => s.string.min_length = Some(expect_count(value, &here)?),
            "maxLength" => s.string.max_length = Some(expect_count(value, &here)?),
            "pattern" => s.string.pattern = Some(read_pattern(expect_str(value, &here)?, &here)?),

            "multipleOf" => {
                let d = expect_number(value, &here)?;
                if !d.as_f64().is_some_and(|f| f > 0.0) {
                    return Err(invalid(&here, "a number greater than zero"));
                }
                s.number.multiple_of = Some(d);
            }
            "minimum" => minimum = Some(expect_number(value, &here)?),
            "maximum" => maximum = Some(expect_number(value, &here)?),
            "exclusiveMinimum" => exclusive_minimum = Some(expect_bool(value, &here)?),
            "exclusiveMaximum" => exclusive_maximum = Some(expect_bool(value, &here)?),

            "items" => s.array.items = Some(read_items(value, &here)?),
            "additionalItems" => s.array.additional_items = Some(read_additional(value, &here)?),
            "minItems" => s.array.min_items = Some(expect_count(value, &here)?),
            "maxItems" => s.array.max_items = Some(expect_count(value, &here)?),
            "uniqueItems" => s.array.unique_items = expect_bool(value, &here)?,

            "properties" => s.object.properties = read_schema_map(value, &here)?,
            "patternProperties" => s.object.pattern_properties = read_pattern_properties(value, &here)?,
            "additionalProperties" => {
                s.object.additional_properties = Some(read_additional(value, &here)?)
            }
            "required" => s.object.required = read_string_list(value, &here)?,
            "dependencies" => s.object.dependencies = read_dependencies(value, &here)?,
            "minProperties" => s.object.min_properties = Some(expect_count(value, &here)?),
            "maxProperties" => s.object.max_properties = Some(expect_count(value, &here)?),

            _ => {
                trace!(keyword = %key, at = %at, "keeping unrecognized keyword");
                s.extras.insert(key.clone(), value.clone());
            }
        }
    }

    s.number.minimum = bound(minimum, exclusive_minimum, at, "exclusiveMinimum", "minimum")?;
    s.number.maximum = bound(maximum, exclusive_maximum, at, "exclusiveMaximum", "maximum")?;
    Ok(s)
}

fn bound(
    limit: Option<Number>,
    exclusive: Option<bool>,
    at: &str,
    keyword: &'static str,
    requires: &'static str,
) -> Result<Option<Bound>> {
    match (limit, exclusive) {
        (Some(limit), exclusive) => Ok(Some(Bound { limit, exclusive: exclusive.unwrap_or(false) })),
        (None, Some(_)) => Err(SchemaFormatError::MissingCompanion {
            at: pointer::push(at, keyword),
            keyword,
            requires,
        }),
        (None, None) => Ok(None),
    }
}

fn read_types(v: &Value, at: &str) -> Result<PrimitiveTypes> {
    fn one(v: &Value, at: &str) -> Result<PrimitiveType> {
        let name = v.as_str().ok_or_else(|| invalid(at, "a type name or an array of type names"))?;
        PrimitiveType::from_name(name)
            .ok_or_else(|| SchemaFormatError::UnknownType { at: at.to_string(), name: name.to_string() })
    }
    match v {
        Value::Array(xs) => xs
            .iter()
            .enumerate()
            .map(|(i, x)| one(x, &pointer::push_index(at, i)))
            .collect(),
        other => Ok(one(other, at)?.into()),
    }
}

fn read_schema_list(v: &Value, at: &str) -> Result<Vec<Schema>> {
    expect_array(v, at, "an array of schemas")?
        .iter()
        .enumerate()
        .map(|(i, x)| read_schema(x, &pointer::push_index(at, i)))
        .collect()
}

fn read_schema_map(v: &Value, at: &str) -> Result<IndexMap<String, Schema>> {
    expect_object(v, at, "an object of schemas")?
        .iter()
        .map(|(k, x)| -> Result<(String, Schema)> {
            Ok((k.clone(), read_schema(x, &pointer::push(at, k))?))
        })
        .collect()
}

fn read_pattern_properties(v: &Value, at: &str) -> Result<Vec<(Pattern, Schema)>> {
    expect_object(v, at, "an object of schemas")?
        .iter()
        .map(|(src, x)| -> Result<(Pattern, Schema)> {
            let here = pointer::push(at, src);
            Ok((read_pattern(src, &here)?, read_schema(x, &here)?))
        })
        .collect()
}

fn read_pattern(src: &str, at: &str) -> Result<Pattern> {
    Pattern::new(src).map_err(|source| SchemaFormatError::InvalidPattern {
        at: at.to_string(),
        pattern: src.to_string(),
        source,
    })
}

fn read_items(v: &Value, at: &str) -> Result<Items> {
    match v {
        Value::Object(_) => Ok(Items::List(Box::new(read_schema(v, at)?))),
        Value::Array(_) => Ok(Items::Tuple(read_schema_list(v, at)?)),
        _ => Err(invalid(at, "a schema or an array of schemas")),
    }
}

fn read_additional(v: &Value, at: &str) -> Result<Additional> {
    match v {
        Value::Bool(true) => Ok(Additional::Permit),
        Value::Bool(false) => Ok(Additional::Forbid),
        Value::Object(_) => Ok(Additional::Schema(Box::new(read_schema(v, at)?))),
        _ => Err(invalid(at, "a boolean or a schema")),
    }
}

fn read_dependencies(v: &Value, at: &str) -> Result<IndexMap<String, Dependency>> {
    expect_object(v, at, "an object")?
        .iter()
        .map(|(k, x)| -> Result<(String, Dependency)> {
            let here = pointer::push(at, k);
            let dep = match x {
                Value::Array(_) => Dependency::Properties(read_string_list(x, &here)?),
                Value::Object(_) => Dependency::Schema(Box::new(read_schema(x, &here)?)),
                _ => return Err(invalid(&here, "an array of property names or a schema")),
            };
            Ok((k.clone(), dep))
        })
        .collect()
}

fn read_string_list(v: &Value, at: &str) -> Result<Vec<String>> {
    let xs = expect_array(v, at, "an array of strings")?;
    let mut out: Vec<String> = Vec::with_capacity(xs.len());
    for x in xs {
        let s = x.as_str().ok_or_else(|| invalid(at, "an array of strings"))?;
        if !out.iter().any(|seen| seen == s) {
            out.push(s.to_string());
        }
    }
    Ok(out)
}

// ---------------------------- Shape checks -------------------------------- //

fn invalid(at: &str, expected: &'static str) -> SchemaFormatError {
    SchemaFormatError::InvalidKeyword { at: at.to_string(), expected }
}

fn expect_str<'a>(v: &'a Value, at: &str) -> Result<&'a str> {
    v.as_str().ok_or_else(|| invalid(at, "a string"))
}

fn expect_bool(v: &Value, at: &str) -> Result<bool> {
    v.as_bool().ok_or_else(|| invalid(at, "a boolean"))
}

fn expect_number(v: &Value, at: &str) -> Result<Number> {
    match v {
        Value::Number(n) => Ok(n.clone()),
        _ => Err(invalid(at, "a number")),
    }
}

/// Non-negative integer; `3.0` is accepted.
fn expect_count(v: &Value, at: &str) -> Result<u64> {
    if let Some(n) = v.as_u64() {
        return Ok(n);
    }
    match v.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(f as u64),
        _ => Err(invalid(at, "a non-negative integer")),
    }
}

fn expect_array<'a>(v: &'a Value, at: &str, expected: &'static str) -> Result<&'a Vec<Value>> {
    v.as_array().ok_or_else(|| invalid(at, expected))
}

fn expect_object<'a>(v: &'a Value, at: &str, expected: &'static str) -> Result<&'a Map<String, Value>> {
    v.as_object().ok_or_else(|| invalid(at, expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extras_are_kept_verbatim() {
        let src = r#"{
  "extra1": "foo",
  "extra2": ["bar", "baz"]
}"#;
        let s: Schema = src.parse().unwrap();
        assert_eq!(s.extras["extra1"], json!("foo"));
        assert_eq!(s.extras["extra2"], json!(["bar", "baz"]));
    }

    #[test]
    fn nested_extras_stay_on_their_node() {
        let s = Schema::from_value(&json!({
            "properties": { "a": { "type": "string", "attrs": { "title": "sssss" }, "unique": true } }
        }))
        .unwrap();
        assert!(s.extras.is_empty());
        let a = s.property("a").unwrap();
        assert_eq!(a.extras["attrs"], json!({ "title": "sssss" }));
        assert_eq!(a.extras["unique"], json!(true));
    }

    #[test]
    fn reads_every_constraint_group() {
        let s = Schema::from_value(&json!({
            "type": ["object", "null"],
            "minLength": 1,
            "pattern": "^a",
            "minimum": 2, "exclusiveMinimum": true, "maximum": 9.5,
            "multipleOf": 0.5,
            "items": [{ "type": "string" }, { "type": "integer" }],
            "additionalItems": false,
            "uniqueItems": true,
            "properties": { "a": {} },
            "patternProperties": { "^x-": { "type": "string" } },
            "additionalProperties": { "type": "number" },
            "required": ["a", "a"],
            "dependencies": { "a": ["b"], "c": { "required": ["d"] } },
            "maxProperties": 4
        }))
        .unwrap();
        assert_eq!(s.types.len(), 2);
        assert_eq!(s.string.min_length, Some(1));
        assert_eq!(s.number.minimum, Some(Bound::exclusive(2)));
        assert_eq!(s.number.maximum, Number::from_f64(9.5).map(Bound::inclusive));
        assert_eq!(s.number.multiple_of, Number::from_f64(0.5));
        assert!(matches!(&s.array.items, Some(Items::Tuple(ts)) if ts.len() == 2));
        assert_eq!(s.array.additional_items, Some(Additional::Forbid));
        assert!(s.array.unique_items);
        assert_eq!(s.object.pattern_properties[0].0.as_str(), "^x-");
        assert!(matches!(s.object.additional_properties, Some(Additional::Schema(_))));
        assert_eq!(s.object.required, vec!["a".to_string()]);
        assert!(matches!(&s.object.dependencies["a"], Dependency::Properties(p) if p == &["b"]));
        assert!(matches!(&s.object.dependencies["c"], Dependency::Schema(_)));
        assert_eq!(s.object.max_properties, Some(4));
    }

    #[test]
    fn root_must_be_an_object() {
        let err = Schema::from_value(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, SchemaFormatError::NotAnObject { at } if at == "#"));
    }

    #[test]
    fn required_must_be_strings() {
        let err = Schema::from_value(&json!({ "properties": { "a": { "required": [1] } } })).unwrap_err();
        match err {
            SchemaFormatError::InvalidKeyword { at, .. } => assert_eq!(at, "#/properties/a/required"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_bad_shapes() {
        for doc in [
            json!({ "type": "any" }),
            json!({ "type": 3 }),
            json!({ "minLength": -1 }),
            json!({ "maxItems": 1.5 }),
            json!({ "multipleOf": 0 }),
            json!({ "items": true }),
            json!({ "additionalProperties": "no" }),
            json!({ "pattern": "(" }),
            json!({ "exclusiveMaximum": true }),
            json!({ "allOf": [true] }),
            json!({ "dependencies": { "a": 1 } }),
        ] {
            assert!(Schema::from_value(&doc).is_err(), "should reject {doc}");
        }
    }

    #[test]
    fn deserializes_through_serde() {
        let s: Schema = serde_json::from_value(json!({ "type": "string", "x-vendor": 1 })).unwrap();
        assert!(s.types.contains(PrimitiveType::String));
        assert_eq!(s.extras["x-vendor"], json!(1));
        assert!(serde_json::from_value::<Schema>(json!({ "type": "nope" })).is_err());
    }

    #[test]
    fn from_reader_reports_decode_errors() {
        let err = Schema::from_reader("{ not json".as_bytes()).unwrap_err();
        assert!(matches!(err, SchemaFormatError::Decode(_)));
    }
}
