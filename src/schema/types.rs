//! Schema type definitions
//!
//! Supported types:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - float: 64-bit floating point
//! - bool: Boolean
//! - datetime: ISO 8601 timestamp, stored as text
//! - uuid: UUID, stored as lowercase hyphenated text
//! - any: arbitrary JSON value, not inspected
//! - object: nested structured value with its own field schema
//! - array: homogeneous array with element type

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::validator::SchemaValidator;

/// Policy for keys present in a document but not declared by the schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraFields {
    /// Undeclared keys are dropped from the normalized value
    #[default]
    Ignore,
    /// Undeclared keys are a validation error
    Forbid,
    /// Undeclared keys are kept verbatim
    Allow,
}

/// Supported field types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Boolean
    Bool,
    /// Timestamp, with or without UTC offset
    DateTime,
    /// UUID
    Uuid,
    /// Any JSON value
    Any,
    /// Nested object with its own field schema
    Object {
        /// Nested field definitions
        fields: BTreeMap<String, FieldDef>,
        /// Extra key policy for this level
        #[serde(default)]
        extra: ExtraFields,
    },
    /// Homogeneous array with single element type
    Array {
        /// Element definition (boxed to allow recursive types)
        element_type: Box<FieldDef>,
    },
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::DateTime => "datetime",
            FieldType::Uuid => "uuid",
            FieldType::Any => "any",
            FieldType::Object { .. } => "object",
            FieldType::Array { .. } => "array",
        }
    }

    /// Nested object type carrying another schema's fields.
    pub fn nested(schema: &Schema) -> Self {
        FieldType::Object {
            fields: schema.fields.clone(),
            extra: schema.extra,
        }
    }

    /// Array whose elements must be present and non-null.
    pub fn array_of(element: FieldType) -> Self {
        FieldType::Array {
            element_type: Box::new(FieldDef::required(element)),
        }
    }
}

fn default_required() -> bool {
    true
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field data type
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether the field must be present (ignored when a default exists)
    #[serde(default = "default_required")]
    pub required: bool,
    /// Whether `null` is an accepted value
    #[serde(default)]
    pub nullable: bool,
    /// Value used when the field is missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Example values, used to build example documents
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Value>,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDef {
    /// A required, non-null field of the given type
    pub fn required(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: true,
            nullable: false,
            default: None,
            examples: Vec::new(),
            description: None,
        }
    }

    /// An optional field that is `null` when missing
    pub fn optional(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            nullable: true,
            default: None,
            examples: Vec::new(),
            description: None,
        }
    }

    /// Create a required string field
    pub fn required_string() -> Self {
        Self::required(FieldType::String)
    }

    /// Create an optional string field
    pub fn optional_string() -> Self {
        Self::optional(FieldType::String)
    }

    /// Create a required int field
    pub fn required_int() -> Self {
        Self::required(FieldType::Int)
    }

    /// Create an optional int field
    pub fn optional_int() -> Self {
        Self::optional(FieldType::Int)
    }

    /// Create a required float field
    pub fn required_float() -> Self {
        Self::required(FieldType::Float)
    }

    /// Create an optional float field
    pub fn optional_float() -> Self {
        Self::optional(FieldType::Float)
    }

    /// Create a required bool field
    pub fn required_bool() -> Self {
        Self::required(FieldType::Bool)
    }

    /// Sets the default used when the field is missing.
    pub fn with_default(mut self, value: Value) -> Self {
        self.required = false;
        self.default = Some(value);
        self
    }

    /// Adds an example value.
    pub fn with_example(mut self, value: Value) -> Self {
        self.examples.push(value);
        self
    }

    /// Sets the description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Allows or forbids `null`.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Example value for this field: first example, else default, else
    /// a nested example for objects.
    pub fn example(&self) -> Option<Value> {
        if let Some(example) = self.examples.first() {
            return Some(example.clone());
        }
        if let Some(default) = &self.default {
            return Some(default.clone());
        }
        match &self.field_type {
            FieldType::Object { fields, .. } => Some(Value::Object(example_object(fields))),
            FieldType::Array { element_type } => {
                element_type.example().map(|e| Value::Array(vec![e]))
            }
            _ => None,
        }
    }
}

fn example_object(fields: &BTreeMap<String, FieldDef>) -> Map<String, Value> {
    fields
        .iter()
        .filter_map(|(name, def)| def.example().map(|v| (name.clone(), v)))
        .collect()
}

/// Complete schema definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema name, unique within a loader
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field definitions
    pub fields: BTreeMap<String, FieldDef>,
    /// Extra key policy at the root level
    #[serde(default)]
    pub extra: ExtraFields,
}

impl Schema {
    /// Create a new schema with no fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: BTreeMap::new(),
            extra: ExtraFields::default(),
        }
    }

    /// Adds a field definition.
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.insert(name.into(), def);
        self
    }

    /// Sets the root extra key policy.
    pub fn with_extra(mut self, extra: ExtraFields) -> Self {
        self.extra = extra;
        self
    }

    /// Sets the description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builds an example document from field examples and defaults.
    pub fn example(&self) -> Value {
        Value::Object(example_object(&self.fields))
    }

    /// Validates the schema structure itself (not a document)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Schema name must not be empty".into());
        }
        check_fields(&self.fields, "")
    }
}

fn check_fields(fields: &BTreeMap<String, FieldDef>, prefix: &str) -> Result<(), String> {
    for (name, def) in fields {
        if name.is_empty() {
            return Err(format!("Empty field name under '{}'", display_prefix(prefix)));
        }
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };

        if let Some(default) = &def.default {
            SchemaValidator::check_value(def, default).map_err(|errors| {
                let first = errors
                    .first()
                    .map(|d| d.to_string())
                    .unwrap_or_default();
                format!("Default for '{}' does not validate: {}", path, first)
            })?;
        }

        match &def.field_type {
            FieldType::Object { fields, .. } => check_fields(fields, &path)?,
            FieldType::Array { element_type } => {
                if let FieldType::Object { fields, .. } = &element_type.field_type {
                    check_fields(fields, &format!("{}[]", path))?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn display_prefix(prefix: &str) -> &str {
    if prefix.is_empty() {
        "$root"
    } else {
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product_schema() -> Schema {
        Schema::new("ProductDefinition")
            .field("name", FieldDef::required_string().with_example(json!("Smart Watch")))
            .field("description", FieldDef::optional_string())
            .field("price", FieldDef::optional_float().with_example(json!(199.99)))
            .field("tags", FieldDef::optional(FieldType::array_of(FieldType::String)))
    }

    #[test]
    fn test_schema_structure_valid() {
        assert!(product_schema().validate_structure().is_ok());
    }

    #[test]
    fn test_schema_name_required() {
        let schema = Schema::new("  ").field("name", FieldDef::required_string());
        assert!(schema.validate_structure().is_err());
    }

    #[test]
    fn test_invalid_default_rejected() {
        let schema = Schema::new("things")
            .field("count", FieldDef::required_int().with_default(json!("lots")));
        let err = schema.validate_structure().unwrap_err();
        assert!(err.contains("count"));
    }

    #[test]
    fn test_nested_invalid_default_rejected() {
        let inner = Schema::new("inner").field("flag", FieldDef::required_bool().with_default(json!([])));
        let schema = Schema::new("outer").field("inner", FieldDef::required(FieldType::nested(&inner)));
        let err = schema.validate_structure().unwrap_err();
        assert!(err.contains("inner.flag"));
    }

    #[test]
    fn test_with_default_makes_optional() {
        let def = FieldDef::required_int().with_default(json!(3));
        assert!(!def.required);
        assert_eq!(def.default, Some(json!(3)));
    }

    #[test]
    fn test_example_document() {
        let example = product_schema().example();
        assert_eq!(example, json!({"name": "Smart Watch", "price": 199.99}));
    }

    #[test]
    fn test_nested_example() {
        let child = product_schema();
        let schema = Schema::new("ParentProductDefinition")
            .field("name", FieldDef::required_string().with_example(json!("Bundle")))
            .field("children", FieldDef::optional(FieldType::array_of(FieldType::nested(&child))));

        let example = schema.example();
        assert_eq!(example["children"][0]["name"], json!("Smart Watch"));
    }

    #[test]
    fn test_schema_json_shape() {
        let schema: Schema = serde_json::from_value(json!({
            "name": "ProductDefinition",
            "fields": {
                "name": { "type": "string" },
                "price": { "type": "float", "required": false, "nullable": true },
                "tags": {
                    "type": "array",
                    "element_type": { "type": "string" },
                    "required": false
                }
            }
        }))
        .unwrap();

        assert_eq!(schema.extra, ExtraFields::Ignore);
        assert!(schema.fields["name"].required);
        assert!(!schema.fields["name"].nullable);
        assert!(schema.fields["price"].nullable);
        assert_eq!(schema.fields["tags"].field_type.type_name(), "array");
    }

    #[test]
    fn test_field_type_names() {
        assert_eq!(FieldType::String.type_name(), "string");
        assert_eq!(FieldType::Int.type_name(), "int");
        assert_eq!(FieldType::Float.type_name(), "float");
        assert_eq!(FieldType::Bool.type_name(), "bool");
        assert_eq!(FieldType::DateTime.type_name(), "datetime");
        assert_eq!(FieldType::Uuid.type_name(), "uuid");
        assert_eq!(FieldType::array_of(FieldType::Int).type_name(), "array");
        assert_eq!(FieldType::nested(&Schema::new("x")).type_name(), "object");
    }
}
