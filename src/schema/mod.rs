//! Schema subsystem
//!
//! A schema describes a structured value as named, typed fields with
//! optional defaults and example values. The validator checks a mapping
//! against a schema and returns a normalized copy with coerced scalars and
//! defaults filled in.
//!
//! # Design Principles
//!
//! - Validation never mutates its input
//! - Every violation is reported, with a field path
//! - Coercion is opt-out (strict mode)
//! - Deterministic validation

mod coerce;
mod errors;
mod loader;
mod types;
mod validator;

pub use errors::{
    SchemaError, SchemaErrorCode, SchemaResult, ValidationDetails, ValidationResult,
    ViolationKind,
};
pub use loader::{read_schema_file, SchemaLoader};
pub use types::{ExtraFields, FieldDef, FieldType, Schema};
pub use validator::{SchemaValidator, ValidationMode};
