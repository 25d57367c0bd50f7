use std::fmt;

use serde_json::Value;

/// A primitive type name usable in the `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrimitiveType {
    Array,
    Boolean,
    Integer,
    Null,
    Number,
    Object,
    String,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 7] = [
        PrimitiveType::Array,
        PrimitiveType::Boolean,
        PrimitiveType::Integer,
        PrimitiveType::Null,
        PrimitiveType::Number,
        PrimitiveType::Object,
        PrimitiveType::String,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveType::Array => "array",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Null => "null",
            PrimitiveType::Number => "number",
            PrimitiveType::Object => "object",
            PrimitiveType::String => "string",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// `number` admits integers; `integer` admits only integral numbers.
    pub fn admits(self, kind: Kind) -> bool {
        match (self, kind) {
            (PrimitiveType::Array, Kind::Array)
            | (PrimitiveType::Boolean, Kind::Boolean)
            | (PrimitiveType::Integer, Kind::Integer)
            | (PrimitiveType::Null, Kind::Null)
            | (PrimitiveType::Number, Kind::Integer | Kind::Number)
            | (PrimitiveType::Object, Kind::Object)
            | (PrimitiveType::String, Kind::String) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The declared `type` set of a schema node. Empty means any type.
///
/// Keeps declaration order and drops duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimitiveTypes(Vec<PrimitiveType>);

impl PrimitiveTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, t: PrimitiveType) -> bool {
        if self.0.contains(&t) {
            return false;
        }
        self.0.push(t);
        true
    }

    pub fn contains(&self, t: PrimitiveType) -> bool {
        self.0.contains(&t)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = PrimitiveType> + '_ {
        self.0.iter().copied()
    }

    /// True when the set is empty or some member admits `kind`.
    pub fn admits(&self, kind: Kind) -> bool {
        self.0.is_empty() || self.0.iter().any(|t| t.admits(kind))
    }
}

impl FromIterator<PrimitiveType> for PrimitiveTypes {
    fn from_iter<I: IntoIterator<Item = PrimitiveType>>(iter: I) -> Self {
        let mut out = Self::new();
        for t in iter {
            out.insert(t);
        }
        out
    }
}

impl From<PrimitiveType> for PrimitiveTypes {
    fn from(t: PrimitiveType) -> Self {
        Self(vec![t])
    }
}

impl fmt::Display for PrimitiveTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => f.write_str("any type"),
            [one] => write!(f, "{one}"),
            many => {
                f.write_str("one of ")?;
                for (i, t) in many.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{t}")?;
                }
                Ok(())
            }
        }
    }
}

/// Runtime kind of a decoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Integer => "integer",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        })
    }
}

/// Classify a value. Numbers without a fractional part (including `2.0`)
/// are `Integer`.
pub fn kind_of(v: &Value) -> Kind {
    match v {
        Value::Null => Kind::Null,
        Value::Bool(_) => Kind::Boolean,
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                Kind::Integer
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 => Kind::Integer,
                    _ => Kind::Number,
                }
            }
        }
        Value::String(_) => Kind::String,
        Value::Array(_) => Kind::Array,
        Value::Object(_) => Kind::Object,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integral_floats_are_integers() {
        assert_eq!(kind_of(&json!(3)), Kind::Integer);
        assert_eq!(kind_of(&json!(3.0)), Kind::Integer);
        assert_eq!(kind_of(&json!(-7)), Kind::Integer);
        assert_eq!(kind_of(&json!(3.5)), Kind::Number);
    }

    #[test]
    fn number_admits_integer_but_not_the_reverse() {
        assert!(PrimitiveType::Number.admits(Kind::Integer));
        assert!(PrimitiveType::Number.admits(Kind::Number));
        assert!(!PrimitiveType::Integer.admits(Kind::Number));
        assert!(!PrimitiveType::String.admits(Kind::Null));
    }

    #[test]
    fn types_dedupe_and_display() {
        let ts: PrimitiveTypes =
            [PrimitiveType::String, PrimitiveType::Null, PrimitiveType::String].into_iter().collect();
        assert_eq!(ts.len(), 2);
        assert_eq!(ts.to_string(), "one of string, null");
        assert!(PrimitiveTypes::new().admits(Kind::Object));
    }
}
