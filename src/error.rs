//! Error types for the three boundaries of the engine: reading a schema
//! document, validating a value, and addressing properties by dotted path.
use std::fmt;

use serde_json::Number;
use thiserror::Error;

use crate::schema::{Kind, PrimitiveTypes};

// ————————————————————————————————————————————————————————————————————————————
// SCHEMA FORMAT
// ————————————————————————————————————————————————————————————————————————————

/// The schema document is structurally invalid for a recognized keyword.
///
/// Every variant carries `at`, a `#`-rooted JSON pointer into the schema
/// document naming the offending node or keyword.
#[derive(Debug, Error)]
pub enum SchemaFormatError {
    #[error("schema at `{at}` must be a JSON object")]
    NotAnObject { at: String },

    #[error("keyword at `{at}` must be {expected}")]
    InvalidKeyword { at: String, expected: &'static str },

    #[error("unknown primitive type `{name}` at `{at}`")]
    UnknownType { at: String, name: String },

    #[error("invalid regular expression `{pattern}` at `{at}`: {source}")]
    InvalidPattern {
        at: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("`{keyword}` at `{at}` is only valid alongside `{requires}`")]
    MissingCompanion {
        at: String,
        keyword: &'static str,
        requires: &'static str,
    },

    #[error("failed to decode schema document: {0}")]
    Decode(#[from] serde_json::Error),
}

// ————————————————————————————————————————————————————————————————————————————
// VALIDATION
// ————————————————————————————————————————————————————————————————————————————

/// A document failed one or more constraints.
///
/// Never empty: the validator only constructs it when at least one violation
/// was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// Number of top-level violations (nested `anyOf`/`oneOf` causes not counted).
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Iterate every violation including nested combinator causes, depth first.
    pub fn flatten(&self) -> Vec<&Violation> {
        fn walk<'a>(vs: &'a [Violation], out: &mut Vec<&'a Violation>) {
            for v in vs {
                out.push(v);
                if let Some(causes) = v.kind.causes() {
                    walk(causes, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.violations, &mut out);
        out
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document failed validation ({} violation", self.violations.len())?;
        if self.violations.len() != 1 {
            write!(f, "s")?;
        }
        write!(f, ")")?;
        for v in &self.violations {
            write!(f, "\n  {v}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// One failed constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// JSON pointer into the validated document; empty for the root.
    pub instance_path: String,
    /// JSON pointer into the schema, ending at the violated keyword.
    pub schema_path: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = if self.instance_path.is_empty() { "(root)" } else { &self.instance_path };
        write!(f, "{at}: {} [#{}]", self.kind, self.schema_path)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViolationKind {
    #[error("expected {expected}, found {found}")]
    Type { expected: PrimitiveTypes, found: Kind },

    #[error("value is not one of the enumerated values")]
    Enum,

    #[error("value must not validate against the `not` schema")]
    Not,

    #[error("value matched none of the anyOf schemas ({} nested failures)", .causes.len())]
    AnyOf { causes: Vec<Violation> },

    #[error("value matched none of the oneOf schemas ({} nested failures)", .causes.len())]
    OneOfNone { causes: Vec<Violation> },

    #[error("value matched oneOf schemas {matched:?}, expected exactly one")]
    OneOfMany { matched: Vec<usize> },

    #[error("string has {actual} characters, fewer than minLength {limit}")]
    MinLength { limit: u64, actual: u64 },

    #[error("string has {actual} characters, more than maxLength {limit}")]
    MaxLength { limit: u64, actual: u64 },

    #[error("string does not match pattern `{pattern}`")]
    Pattern { pattern: String },

    #[error("value is not a valid `{format}`: {reason}")]
    Format { format: String, reason: String },

    #[error("{actual} is below the {} minimum {limit}", bound_word(.exclusive))]
    Minimum { limit: Number, exclusive: bool, actual: Number },

    #[error("{actual} is above the {} maximum {limit}", bound_word(.exclusive))]
    Maximum { limit: Number, exclusive: bool, actual: Number },

    #[error("{actual} is not a multiple of {divisor}")]
    MultipleOf { divisor: Number, actual: Number },

    #[error("array has {actual} items, fewer than minItems {limit}")]
    MinItems { limit: u64, actual: usize },

    #[error("array has {actual} items, more than maxItems {limit}")]
    MaxItems { limit: u64, actual: usize },

    #[error("items {first} and {second} are equal but uniqueItems is set")]
    UniqueItems { first: usize, second: usize },

    #[error("array has {actual} items but the tuple allows only {allowed}")]
    AdditionalItems { allowed: usize, actual: usize },

    #[error("required property `{property}` is missing")]
    Required { property: String },

    #[error("property `{property}` is not allowed")]
    AdditionalProperty { property: String },

    #[error("property `{property}` requires `{missing}` to be present")]
    Dependency { property: String, missing: String },

    #[error("object has {actual} properties, fewer than minProperties {limit}")]
    MinProperties { limit: u64, actual: usize },

    #[error("object has {actual} properties, more than maxProperties {limit}")]
    MaxProperties { limit: u64, actual: usize },
}

impl ViolationKind {
    /// Branch failures carried by `anyOf`/`oneOf` violations.
    pub fn causes(&self) -> Option<&[Violation]> {
        match self {
            Self::AnyOf { causes } | Self::OneOfNone { causes } => Some(causes),
            _ => None,
        }
    }
}

fn bound_word(exclusive: &bool) -> &'static str {
    if *exclusive { "exclusive" } else { "inclusive" }
}

// ————————————————————————————————————————————————————————————————————————————
// TREE EDITING
// ————————————————————————————————————————————————————————————————————————————

/// A dotted property path is syntactically malformed.
///
/// A well-formed path that names no existing property is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("property path is empty")]
    Empty,

    #[error("property path `{path}` has an empty segment at position {position}")]
    EmptySegment { path: String, position: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_display_names_root_and_schema_path() {
        let v = Violation {
            instance_path: String::new(),
            schema_path: "/required".into(),
            kind: ViolationKind::Required { property: "id".into() },
        };
        assert_eq!(v.to_string(), "(root): required property `id` is missing [#/required]");
    }

    #[test]
    fn bound_messages_mention_exclusivity() {
        let k = ViolationKind::Minimum { limit: 2.into(), exclusive: true, actual: 2.into() };
        assert!(k.to_string().contains("exclusive minimum"));
        let k = ViolationKind::Maximum { limit: 2.into(), exclusive: false, actual: 3.into() };
        assert!(k.to_string().contains("inclusive maximum"));
    }

    #[test]
    fn flatten_walks_nested_causes() {
        let leaf = Violation {
            instance_path: "/a".into(),
            schema_path: "/anyOf/0/type".into(),
            kind: ViolationKind::Enum,
        };
        let err = ValidationError::new(vec![Violation {
            instance_path: "/a".into(),
            schema_path: "/anyOf".into(),
            kind: ViolationKind::AnyOf { causes: vec![leaf.clone()] },
        }]);
        assert_eq!(err.len(), 1);
        let all = err.flatten();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1], &leaf);
    }
}
