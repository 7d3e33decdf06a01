//! Structured value types backed by a schema.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use super::errors::{FieldError, FieldResult};
use crate::schema::{ExtraFields, Schema, SchemaValidator, ValidationDetails, ValidationMode};

/// A Rust type whose values are stored through a [`JsonField`](super::JsonField).
///
/// The schema validates and coerces incoming mappings; serde then builds
/// the typed value from the normalized mapping. The two must agree: every
/// field the struct requires should be declared by the schema.
pub trait Model: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    /// Stable name, recorded by field deconstruction.
    const NAME: &'static str;

    /// Schema describing this type's fields.
    fn schema() -> Schema;

    /// Builds a validated value from a plain mapping.
    fn validate(mapping: &Map<String, Value>) -> FieldResult<Self> {
        let schema = Self::schema();
        ValidationContext::new(&schema, ValidationMode::default(), None).build(mapping)
    }

    /// Plain mapping form of this value.
    fn dump(&self) -> FieldResult<Map<String, Value>> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(FieldError::serialization(
                Self::NAME,
                format!("expected an object, got {}", json_kind(&other)),
            )),
            Err(e) => Err(FieldError::serialization(Self::NAME, e)),
        }
    }
}

/// Everything needed to turn a mapping into a validated instance.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    schema: &'a Schema,
    mode: ValidationMode,
    extra: Option<ExtraFields>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(schema: &'a Schema, mode: ValidationMode, extra: Option<ExtraFields>) -> Self {
        Self {
            schema,
            mode,
            extra,
        }
    }

    pub fn schema(&self) -> &Schema {
        self.schema
    }

    /// Validates the mapping and builds `M` from its normalized form.
    pub fn build<M: Model>(&self, mapping: &Map<String, Value>) -> FieldResult<M> {
        let normalized = SchemaValidator::new(self.schema)
            .with_mode(self.mode)
            .with_extra(self.extra)
            .validate_map(mapping)
            .map_err(|errors| FieldError::validation(M::NAME, errors))?;

        serde_json::from_value(Value::Object(normalized)).map_err(|e| {
            FieldError::validation(
                M::NAME,
                vec![ValidationDetails::type_mismatch(
                    "$root",
                    format!("a value readable as {}", M::NAME),
                    e.to_string(),
                )],
            )
        })
    }

    /// Like [`build`](Self::build) for any JSON value; non-objects fail at `$root`.
    pub fn build_value<M: Model>(&self, value: &Value) -> FieldResult<M> {
        match value {
            Value::Object(map) => self.build(map),
            other => Err(FieldError::validation(
                M::NAME,
                vec![ValidationDetails::type_mismatch(
                    "$root",
                    "object",
                    json_kind(other),
                )],
            )),
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
