//! [`Schema`] → decoded document.
//!
//! Recognized keywords come first in a fixed order, extras last. Output is
//! semantically equivalent to what was read; key order may differ. Numbers
//! are written back exactly as they were read.
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::{Additional, Dependency, Items, Schema};

impl Schema {
    pub fn to_value(&self) -> Value {
        let mut o = Map::new();
        let mut put = |k: &str, v: Value| {
            o.insert(k.to_string(), v);
        };

        if let Some(x) = &self.id {
            put("id", x.as_str().into());
        }
        if let Some(x) = &self.schema_uri {
            put("$schema", x.as_str().into());
        }
        if let Some(x) = &self.reference {
            put("$ref", x.as_str().into());
        }
        if let Some(x) = &self.title {
            put("title", x.as_str().into());
        }
        if let Some(x) = &self.description {
            put("description", x.as_str().into());
        }
        if let Some(x) = &self.default {
            put("default", x.clone());
        }

        // ---- type / enum / format ----
        let mut names = self.types.iter().map(|t| Value::from(t.as_str()));
        match self.types.len() {
            0 => {}
            1 => put("type", names.next().unwrap_or_default()),
            _ => put("type", Value::Array(names.collect())),
        }
        if let Some(xs) = &self.enumeration {
            put("enum", Value::Array(xs.clone()));
        }
        if let Some(x) = &self.format {
            put("format", x.as_str().into());
        }

        // ---- combinators ----
        if !self.all_of.is_empty() {
            put("allOf", schema_list(&self.all_of));
        }
        if !self.any_of.is_empty() {
            put("anyOf", schema_list(&self.any_of));
        }
        if !self.one_of.is_empty() {
            put("oneOf", schema_list(&self.one_of));
        }
        if let Some(x) = &self.not {
            put("not", x.to_value());
        }
        if !self.definitions.is_empty() {
            put("definitions", schema_map(&self.definitions));
        }

        // ---- string ----
        let st = &self.string;
        if let Some(n) = st.min_length {
            put("minLength", n.into());
        }
        if let Some(n) = st.max_length {
            put("maxLength", n.into());
        }
        if let Some(p) = &st.pattern {
            put("pattern", p.as_str().into());
        }

        // ---- number, written back exactly as read ----
        let num = &self.number;
        if let Some(d) = &num.multiple_of {
            put("multipleOf", Value::Number(d.clone()));
        }
        if let Some(b) = &num.minimum {
            put("minimum", Value::Number(b.limit.clone()));
            if b.exclusive {
                put("exclusiveMinimum", true.into());
            }
        }
        if let Some(b) = &num.maximum {
            put("maximum", Value::Number(b.limit.clone()));
            if b.exclusive {
                put("exclusiveMaximum", true.into());
            }
        }

        // ---- array ----
        let arr = &self.array;
        match &arr.items {
            Some(Items::List(s)) => put("items", s.to_value()),
            Some(Items::Tuple(xs)) => put("items", schema_list(xs)),
            None => {}
        }
        if let Some(a) = &arr.additional_items {
            put("additionalItems", additional(a));
        }
        if let Some(n) = arr.min_items {
            put("minItems", n.into());
        }
        if let Some(n) = arr.max_items {
            put("maxItems", n.into());
        }
        if arr.unique_items {
            put("uniqueItems", true.into());
        }

        // ---- object ----
        let obj = &self.object;
        if !obj.properties.is_empty() {
            put("properties", schema_map(&obj.properties));
        }
        if !obj.pattern_properties.is_empty() {
            put(
                "patternProperties",
                Value::Object(
                    obj.pattern_properties
                        .iter()
                        .map(|(p, s)| (p.as_str().to_string(), s.to_value()))
                        .collect(),
                ),
            );
        }
        if let Some(a) = &obj.additional_properties {
            put("additionalProperties", additional(a));
        }
        if !obj.required.is_empty() {
            put("required", string_list(&obj.required));
        }
        if !obj.dependencies.is_empty() {
            put(
                "dependencies",
                Value::Object(obj.dependencies.iter().map(|(k, d)| (k.clone(), dependency(d))).collect()),
            );
        }
        if let Some(n) = obj.min_properties {
            put("minProperties", n.into());
        }
        if let Some(n) = obj.max_properties {
            put("maxProperties", n.into());
        }

        // ---- extras, verbatim ----
        for (k, v) in &self.extras {
            put(k.as_str(), v.clone());
        }

        Value::Object(o)
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

fn schema_list(xs: &[Schema]) -> Value {
    Value::Array(xs.iter().map(Schema::to_value).collect())
}

fn schema_map(xs: &IndexMap<String, Schema>) -> Value {
    Value::Object(xs.iter().map(|(k, s)| (k.clone(), s.to_value())).collect())
}

fn string_list(xs: &[String]) -> Value {
    Value::Array(xs.iter().map(|s| Value::from(s.as_str())).collect())
}

fn additional(a: &Additional) -> Value {
    match a {
        Additional::Permit => Value::Bool(true),
        Additional::Forbid => Value::Bool(false),
        Additional::Schema(s) => s.to_value(),
    }
}

fn dependency(d: &Dependency) -> Value {
    match d {
        Dependency::Properties(names) => string_list(names),
        Dependency::Schema(s) => s.to_value(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::json_eq;
    use serde_json::json;

    fn round_trip(doc: Value) {
        let s = Schema::from_value(&doc).unwrap();
        let out = s.to_value();
        assert!(json_eq(&doc, &out), "round trip changed\n  in:  {doc}\n  out: {out}");
        assert_eq!(Schema::from_value(&out).unwrap(), s);
    }

    #[test]
    fn unedited_schemas_round_trip() {
        round_trip(json!({ "extra1": "foo", "extra2": ["bar", "baz"] }));
        round_trip(json!({
            "id": "http://example.com/s", "$schema": "http://json-schema.org/draft-04/schema#",
            "title": "t", "description": "d", "default": { "a": [1] },
            "type": ["string", "null"], "enum": ["a", null], "format": "email",
            "minLength": 1, "maxLength": 9, "pattern": "^a"
        }));
        round_trip(json!({
            "allOf": [{ "type": "number" }], "anyOf": [{ "minimum": 1 }, { "maximum": 2.5, "exclusiveMaximum": true }],
            "oneOf": [{ "multipleOf": 3 }], "not": { "type": "null" },
            "definitions": { "pos": { "minimum": 0, "exclusiveMinimum": true } }
        }));
        round_trip(json!({
            "items": [{ "type": "string" }, { "$ref": "#/definitions/pos" }],
            "additionalItems": { "type": "boolean" }, "minItems": 1, "maxItems": 3, "uniqueItems": true
        }));
        round_trip(json!({
            "properties": { "a": { "x-attrs": { "title": "sssss" } } },
            "patternProperties": { "^x-": {} }, "additionalProperties": false,
            "required": ["a"], "dependencies": { "a": ["b"], "b": { "minProperties": 2 } },
            "minProperties": 1, "maxProperties": 5
        }));
    }

    #[test]
    fn single_type_is_a_string() {
        let s = Schema::from_value(&json!({ "type": ["integer"] })).unwrap();
        assert_eq!(s.to_value(), json!({ "type": "integer" }));
    }

    #[test]
    fn numeric_limits_are_written_back_as_read() {
        let doc = json!({
            "minimum": 18446744073709551615u64,
            "maximum": 9007199254740993u64,
            "multipleOf": 2.5
        });
        let s = Schema::from_value(&doc).unwrap();
        assert_eq!(s.to_value(), doc);
        let out = serde_json::to_string(&s).unwrap();
        assert_eq!(out, r#"{"multipleOf":2.5,"minimum":18446744073709551615,"maximum":9007199254740993}"#);

        let floats = Schema::from_value(&json!({ "minimum": 2.0, "maximum": -3 })).unwrap();
        assert_eq!(serde_json::to_string(&floats).unwrap(), r#"{"minimum":2.0,"maximum":-3}"#);
    }
}
