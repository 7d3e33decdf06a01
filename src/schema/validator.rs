//! Schema validator for structured values
//!
//! Validation semantics:
//! - Root must be a JSON object
//! - Missing fields take their default, else fail if required, else become null when nullable
//! - Null only for nullable fields
//! - Undeclared fields follow the schema's extra policy
//! - Scalars are coerced per the validation mode
//! - Nested objects and array elements are validated recursively
//!
//! The validator never mutates its input. It returns a normalized copy, or
//! every violation found, in field order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::coerce;
use super::errors::{ValidationDetails, ValidationResult};
use super::types::{ExtraFields, FieldDef, FieldType, Schema};

const ROOT: &str = "$root";

/// How strictly scalar values are matched against declared types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Textual and numeric spellings are converted to the declared type
    #[default]
    Lax,
    /// Exact JSON types only (ints are still accepted for floats)
    Strict,
}

impl ValidationMode {
    pub fn is_lax(self) -> bool {
        self == ValidationMode::Lax
    }
}

/// Schema validator that checks documents and produces normalized copies.
pub struct SchemaValidator<'a> {
    schema: &'a Schema,
    mode: ValidationMode,
    extra: Option<ExtraFields>,
}

impl<'a> SchemaValidator<'a> {
    /// Creates a lax validator for the given schema.
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            mode: ValidationMode::default(),
            extra: None,
        }
    }

    /// Sets the validation mode.
    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Overrides the schema's root extra key policy.
    pub fn with_extra(mut self, extra: Option<ExtraFields>) -> Self {
        self.extra = extra;
        self
    }

    /// Validates a document, which must be a JSON object.
    pub fn validate(&self, document: &Value) -> ValidationResult<Value> {
        let obj = document.as_object().ok_or_else(|| {
            vec![ValidationDetails::type_mismatch(
                ROOT,
                "object",
                coerce::describe(document),
            )]
        })?;
        self.validate_map(obj).map(Value::Object)
    }

    /// Validates a mapping and returns its normalized form.
    pub fn validate_map(&self, obj: &Map<String, Value>) -> ValidationResult<Map<String, Value>> {
        let mut errors = Vec::new();
        let extra = self.extra.unwrap_or(self.schema.extra);
        let normalized = self.validate_object(obj, &self.schema.fields, extra, "", &mut errors);

        if errors.is_empty() {
            Ok(normalized)
        } else {
            Err(errors)
        }
    }

    /// Checks a single value against a field definition in lax mode.
    pub fn check_value(def: &FieldDef, value: &Value) -> ValidationResult<Value> {
        let schema = Schema::new(ROOT);
        let validator = SchemaValidator::new(&schema);
        let mut errors = Vec::new();

        match validator.validate_field(value, def, "", &mut errors) {
            Some(normalized) if errors.is_empty() => Ok(normalized),
            _ => Err(errors),
        }
    }

    /// Validates an object against field definitions.
    fn validate_object(
        &self,
        obj: &Map<String, Value>,
        fields: &BTreeMap<String, FieldDef>,
        extra: ExtraFields,
        path_prefix: &str,
        errors: &mut Vec<ValidationDetails>,
    ) -> Map<String, Value> {
        let mut normalized = Map::new();

        for (field_name, field_def) in fields {
            let field_path = make_path(path_prefix, field_name);

            match obj.get(field_name) {
                Some(value) => {
                    if let Some(v) = self.validate_field(value, field_def, &field_path, errors) {
                        normalized.insert(field_name.clone(), v);
                    }
                }
                None => {
                    if let Some(default) = &field_def.default {
                        normalized.insert(field_name.clone(), default.clone());
                    } else if field_def.required {
                        errors.push(ValidationDetails::missing_field(field_path));
                    } else if field_def.nullable {
                        normalized.insert(field_name.clone(), Value::Null);
                    }
                }
            }
        }

        for (key, value) in obj {
            if fields.contains_key(key) {
                continue;
            }
            match extra {
                ExtraFields::Ignore => {}
                ExtraFields::Forbid => {
                    errors.push(ValidationDetails::extra_field(make_path(path_prefix, key)));
                }
                ExtraFields::Allow => {
                    normalized.insert(key.clone(), value.clone());
                }
            }
        }

        normalized
    }

    /// Validates a present value against a field definition, null included.
    fn validate_field(
        &self,
        value: &Value,
        def: &FieldDef,
        field_path: &str,
        errors: &mut Vec<ValidationDetails>,
    ) -> Option<Value> {
        if value.is_null() {
            if def.nullable {
                return Some(Value::Null);
            }
            errors.push(ValidationDetails::null_value(display_path(field_path)));
            return None;
        }
        self.validate_value(value, &def.field_type, field_path, errors)
    }

    /// Validates a non-null value against a field type.
    fn validate_value(
        &self,
        value: &Value,
        expected_type: &FieldType,
        field_path: &str,
        errors: &mut Vec<ValidationDetails>,
    ) -> Option<Value> {
        let coerced = match expected_type {
            FieldType::String => coerce::coerce_string(value, self.mode),
            FieldType::Int => coerce::coerce_int(value, self.mode),
            FieldType::Float => coerce::coerce_float(value, self.mode),
            FieldType::Bool => coerce::coerce_bool(value, self.mode),
            FieldType::DateTime => coerce::coerce_datetime(value, self.mode),
            FieldType::Uuid => coerce::coerce_uuid(value, self.mode),
            FieldType::Any => Some(value.clone()),
            FieldType::Object { fields, extra } => {
                let Some(obj) = value.as_object() else {
                    errors.push(type_error(field_path, expected_type, value));
                    return None;
                };
                let before = errors.len();
                let nested = self.validate_object(obj, fields, *extra, field_path, errors);
                return (errors.len() == before).then_some(Value::Object(nested));
            }
            FieldType::Array { element_type } => {
                let Some(arr) = value.as_array() else {
                    errors.push(type_error(field_path, expected_type, value));
                    return None;
                };
                let before = errors.len();
                let items: Vec<Value> = arr
                    .iter()
                    .enumerate()
                    .filter_map(|(i, elem)| {
                        let elem_path = format!("{}[{}]", field_path, i);
                        self.validate_field(elem, element_type, &elem_path, errors)
                    })
                    .collect();
                return (errors.len() == before).then_some(Value::Array(items));
            }
        };

        if coerced.is_none() {
            errors.push(type_error(field_path, expected_type, value));
        }
        coerced
    }
}

/// Creates a field path from prefix and field name.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        ROOT
    } else {
        path
    }
}

/// Creates a type mismatch error.
fn type_error(field_path: &str, expected: &FieldType, actual: &Value) -> ValidationDetails {
    ValidationDetails::type_mismatch(
        display_path(field_path),
        expected.type_name(),
        coerce::describe(actual),
    )
}
