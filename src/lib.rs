//! schemafield - schema-validated structured values in a JSON column
//!
//! A record attribute is stored as JSON text and read back as a validated
//! Rust value. Mappings and text are always validated against the field's
//! schema on the way in; nothing unvalidated reaches storage.

pub mod cli;
pub mod config;
pub mod field;
pub mod schema;

pub use config::{ConfigError, FieldOptions};
pub use field::{FieldError, FieldResult, FieldSlot, JsonField, Model, RawValue};
pub use schema::{FieldDef, FieldType, Schema};
