//! In-memory schema tree (draft-04 dialect).
//!
//! A [`Schema`] owns its children outright: no sharing, no cycles. Keywords
//! that only mean something for one runtime kind live in a per-kind
//! constraint group ([`StringConstraints`], [`NumberConstraints`],
//! [`ArrayConstraints`], [`ObjectConstraints`]) so the validator can only
//! reach them after matching the value's kind. Keywords the reader does not
//! recognize are kept verbatim in [`Schema::extras`].
pub mod kind;
pub mod read;
pub mod write;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Number, Value};

pub use kind::{Kind, PrimitiveType, PrimitiveTypes, kind_of};

// ------------------------------- Node ------------------------------------ //

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub id: Option<String>,
    /// `$schema`
    pub schema_uri: Option<String>,
    /// `$ref`, kept for round-tripping; never resolved.
    pub reference: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub default: Option<Value>,

    pub types: PrimitiveTypes,
    pub format: Option<String>,
    pub enumeration: Option<Vec<Value>>,

    pub all_of: Vec<Schema>,
    pub any_of: Vec<Schema>,
    pub one_of: Vec<Schema>,
    pub not: Option<Box<Schema>>,

    pub definitions: IndexMap<String, Schema>,

    pub string: StringConstraints,
    pub number: NumberConstraints,
    pub array: ArrayConstraints,
    pub object: ObjectConstraints,

    /// Unrecognized keywords, verbatim.
    pub extras: IndexMap<String, Value>,
}

impl Schema {
    /// The empty schema; accepts every value.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of_type(t: PrimitiveType) -> Self {
        Self { types: t.into(), ..Self::default() }
    }

    /// Child property schema, if declared under `properties`.
    pub fn property(&self, name: &str) -> Option<&Schema> {
        self.object.properties.get(name)
    }

    pub fn has_combinators(&self) -> bool {
        !self.all_of.is_empty() || !self.any_of.is_empty() || !self.one_of.is_empty() || self.not.is_some()
    }
}

// ------------------------------ Shared ----------------------------------- //

/// A compiled regular expression that remembers its source text.
///
/// Matching is an unanchored search: the expression must anchor itself with
/// `^`/`$` to constrain the whole string.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.0.is_match(haystack)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

/// `additionalProperties` / `additionalItems`.
#[derive(Debug, Clone, PartialEq)]
pub enum Additional {
    Permit,
    Forbid,
    Schema(Box<Schema>),
}

// ------------------------------ String ----------------------------------- //

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringConstraints {
    /// Counted in Unicode scalar values.
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<Pattern>,
}

impl StringConstraints {
    pub fn is_empty(&self) -> bool {
        self.min_length.is_none() && self.max_length.is_none() && self.pattern.is_none()
    }
}

// ------------------------------ Number ----------------------------------- //

/// A numeric limit; `exclusive` turns `<=`/`>=` into `<`/`>`.
///
/// The limit is kept as written so large integers compare and re-serialize
/// exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub limit: Number,
    pub exclusive: bool,
}

impl Bound {
    pub fn inclusive(limit: impl Into<Number>) -> Self {
        Self { limit: limit.into(), exclusive: false }
    }

    pub fn exclusive(limit: impl Into<Number>) -> Self {
        Self { limit: limit.into(), exclusive: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberConstraints {
    pub multiple_of: Option<Number>,
    pub minimum: Option<Bound>,
    pub maximum: Option<Bound>,
}

impl NumberConstraints {
    pub fn is_empty(&self) -> bool {
        self.multiple_of.is_none() && self.minimum.is_none() && self.maximum.is_none()
    }
}

// ------------------------------ Array ------------------------------------ //

#[derive(Debug, Clone, PartialEq)]
pub enum Items {
    /// One schema for every element.
    List(Box<Schema>),
    /// Element `i` validates against schema `i`.
    Tuple(Vec<Schema>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayConstraints {
    pub items: Option<Items>,
    /// Only consulted for tuple-form `items`.
    pub additional_items: Option<Additional>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub unique_items: bool,
}

impl ArrayConstraints {
    pub fn is_empty(&self) -> bool {
        self.items.is_none()
            && self.additional_items.is_none()
            && self.min_items.is_none()
            && self.max_items.is_none()
            && !self.unique_items
    }
}

// ------------------------------ Object ----------------------------------- //

#[derive(Debug, Clone, PartialEq)]
pub enum Dependency {
    /// Co-required property names.
    Properties(Vec<String>),
    /// The whole object must also satisfy this schema.
    Schema(Box<Schema>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectConstraints {
    pub properties: IndexMap<String, Schema>,
    /// Applied in order; every matching entry applies.
    pub pattern_properties: Vec<(Pattern, Schema)>,
    pub additional_properties: Option<Additional>,
    pub required: Vec<String>,
    pub dependencies: IndexMap<String, Dependency>,
    pub min_properties: Option<u64>,
    pub max_properties: Option<u64>,
}

impl ObjectConstraints {
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
            && self.pattern_properties.is_empty()
            && self.additional_properties.is_none()
            && self.required.is_empty()
            && self.dependencies.is_empty()
            && self.min_properties.is_none()
            && self.max_properties.is_none()
    }

    /// True when `name` is matched by `properties` or any `patternProperties` entry.
    pub fn covers(&self, name: &str) -> bool {
        self.properties.contains_key(name)
            || self.pattern_properties.iter().any(|(p, _)| p.is_match(name))
    }
}
