//! JSON Schema (draft-04) engine over decoded `serde_json` values.
//!
//! - [`Schema`]: the schema tree, read from a decoded document with
//!   [`Schema::from_value`] and written back with [`Schema::to_value`];
//!   unknown keywords survive the round trip in [`Schema::extras`].
//! - [`Validator`]: checks a value against a schema and reports every
//!   violation with document and schema locations.
//! - [`Schema::delete_prop`] / [`Schema::get_all_props`]: dotted-path edits
//!   and listings over nested property schemas.
//!
//! ```
//! use schemata::Schema;
//! use serde_json::json;
//!
//! let schema = Schema::from_value(&json!({
//!     "type": "object",
//!     "properties": { "age": { "type": "integer", "minimum": 0 } },
//!     "required": ["age"]
//! })).unwrap();
//! assert!(schema.validate(&json!({ "age": 30 })).is_ok());
//! assert!(schema.validate(&json!({ "age": -1 })).is_err());
//! ```
pub mod canon;
pub mod edit;
pub mod error;
pub mod format;
pub mod path_de;
mod pointer;
pub mod schema;
pub mod suite;
pub mod validate;

pub use error::{PathError, SchemaFormatError, ValidationError, Violation, ViolationKind};
pub use format::{FormatCheck, FormatRegistry};
pub use schema::{
    Additional, ArrayConstraints, Bound, Dependency, Items, Kind, NumberConstraints, ObjectConstraints,
    Pattern, PrimitiveType, PrimitiveTypes, Schema, StringConstraints,
};
pub use validate::{Validator, validate};
