//! Validation of decoded documents against a [`Schema`].
//!
//! Every node is checked in the same order:
//! 1. `type` (a mismatch stops this node; nothing else is meaningful for it)
//! 2. `enum`, `not`, `allOf`, `anyOf`, `oneOf`
//! 3. the constraint group for the value's kind (`string`, `number`, `array`, `object`)
//! 4. `format`, through the [`FormatRegistry`]
//!
//! Nothing short-circuits past step 1: every combinator branch is evaluated
//! and every violation underneath a node is reported.
mod array;
mod number;
mod object;
mod string;

use serde_json::Value;
use tracing::{debug, trace};

use crate::canon::Canon;
use crate::error::{ValidationError, Violation, ViolationKind};
use crate::format::FormatRegistry;
use crate::pointer;
use crate::schema::{Schema, kind_of};

/// Validate `value` against `schema` with the shared default format registry.
pub fn validate(schema: &Schema, value: &Value) -> Result<(), ValidationError> {
    Validator::new(schema).validate(value)
}

impl Schema {
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        Validator::new(self).validate(value)
    }

    pub fn is_valid(&self, value: &Value) -> bool {
        Validator::new(self).is_valid(value)
    }
}

// ------------------------------ Validator --------------------------------- //

/// A read-only view of a schema plus the format checks to apply.
///
/// Validation never mutates the schema, so one `Validator` can be shared
/// across threads.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    schema: &'a Schema,
    formats: &'a FormatRegistry,
}

impl<'a> Validator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema, formats: FormatRegistry::shared() }
    }

    pub fn with_formats(mut self, formats: &'a FormatRegistry) -> Self {
        self.formats = formats;
        self
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let violations = self.collect(self.schema, value, &Loc::root());
        if violations.is_empty() {
            Ok(())
        } else {
            debug!(count = violations.len(), "document failed validation");
            Err(ValidationError::new(violations))
        }
    }

    pub fn is_valid(&self, value: &Value) -> bool {
        self.collect(self.schema, value, &Loc::root()).is_empty()
    }

    /// Violations of `value` against a sub-schema, as a fresh list.
    pub(crate) fn collect(&self, schema: &Schema, value: &Value, loc: &Loc) -> Vec<Violation> {
        let mut out = Vec::new();
        self.check(schema, value, loc, &mut out);
        out
    }

    pub(crate) fn check(&self, schema: &Schema, value: &Value, loc: &Loc, out: &mut Vec<Violation>) {
        let kind = kind_of(value);
        trace!(instance = %loc.instance, schema = %loc.schema, %kind, "checking node");

        if !schema.types.admits(kind) {
            out.push(loc.violation("type", ViolationKind::Type { expected: schema.types.clone(), found: kind }));
            return;
        }

        if let Some(r) = &schema.reference {
            debug!(reference = %r, schema = %loc.schema, "$ref is not resolved; ignoring it");
        }

        if let Some(allowed) = &schema.enumeration {
            let canon = Canon::from(value);
            if !allowed.iter().any(|a| Canon::from(a) == canon) {
                out.push(loc.violation("enum", ViolationKind::Enum));
            }
        }

        if let Some(not) = &schema.not {
            if self.collect(not, value, &loc.keyword("not")).is_empty() {
                out.push(loc.violation("not", ViolationKind::Not));
            }
        }

        for (i, sub) in schema.all_of.iter().enumerate() {
            self.check(sub, value, &loc.keyword("allOf").index(i), out);
        }

        if !schema.any_of.is_empty() {
            let mut matched = false;
            let mut causes = Vec::new();
            for (i, sub) in schema.any_of.iter().enumerate() {
                let errs = self.collect(sub, value, &loc.keyword("anyOf").index(i));
                if errs.is_empty() {
                    matched = true;
                } else {
                    causes.extend(errs);
                }
            }
            if !matched {
                out.push(loc.violation("anyOf", ViolationKind::AnyOf { causes }));
            }
        }

        if !schema.one_of.is_empty() {
            let mut matched = Vec::new();
            let mut causes = Vec::new();
            for (i, sub) in schema.one_of.iter().enumerate() {
                let errs = self.collect(sub, value, &loc.keyword("oneOf").index(i));
                if errs.is_empty() {
                    matched.push(i);
                } else {
                    causes.extend(errs);
                }
            }
            match matched.len() {
                1 => {}
                0 => out.push(loc.violation("oneOf", ViolationKind::OneOfNone { causes })),
                _ => out.push(loc.violation("oneOf", ViolationKind::OneOfMany { matched })),
            }
        }

        match value {
            Value::String(s) => string::check(&schema.string, s, loc, out),
            Value::Number(n) => number::check(&schema.number, n, loc, out),
            Value::Array(xs) => array::check(self, &schema.array, xs, loc, out),
            Value::Object(m) => object::check(self, &schema.object, value, m, loc, out),
            Value::Bool(_) | Value::Null => {}
        }

        if let Some(name) = &schema.format {
            match self.formats.get(name) {
                Some(check) => {
                    if let Err(reason) = check.check(value) {
                        out.push(loc.violation("format", ViolationKind::Format { format: name.clone(), reason }));
                    }
                }
                None => debug!(format = %name, "no check registered for format; accepting"),
            }
        }
    }
}

// ------------------------------ Locations --------------------------------- //

/// Where the walk currently is, in the document and in the schema.
#[derive(Debug, Clone, Default)]
pub(crate) struct Loc {
    pub instance: String,
    pub schema: String,
}

impl Loc {
    pub fn root() -> Self {
        Self::default()
    }

    /// Step into a schema keyword; the document position is unchanged.
    pub fn keyword(&self, token: &str) -> Self {
        Self { instance: self.instance.clone(), schema: pointer::push(&self.schema, token) }
    }

    /// Step into a schema array entry (`allOf/2`, `items/0`).
    pub fn index(&self, i: usize) -> Self {
        Self { instance: self.instance.clone(), schema: pointer::push_index(&self.schema, i) }
    }

    /// Step into a document member.
    pub fn member(&self, key: &str) -> Self {
        Self { instance: pointer::push(&self.instance, key), schema: self.schema.clone() }
    }

    /// Step into a document array element.
    pub fn element(&self, i: usize) -> Self {
        Self { instance: pointer::push_index(&self.instance, i), schema: self.schema.clone() }
    }

    pub fn violation(&self, keyword: &str, kind: ViolationKind) -> Violation {
        Violation {
            instance_path: self.instance.clone(),
            schema_path: pointer::push(&self.schema, keyword),
            kind,
        }
    }
}
