//! Schema error types
//!
//! Error codes:
//! - SCHEMA_MALFORMED: schema file or definition is invalid
//! - SCHEMA_DUPLICATE: schema name already registered
//! - SCHEMA_UNKNOWN: schema name not found
//! - SCHEMA_IO: schema file could not be read

use serde::Serialize;
use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Schema definition is invalid
    SchemaMalformed,
    /// Schema name registered twice
    SchemaDuplicate,
    /// Schema name not found
    SchemaUnknown,
    /// Schema file could not be read
    SchemaIo,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::SchemaMalformed => "SCHEMA_MALFORMED",
            SchemaErrorCode::SchemaDuplicate => "SCHEMA_DUPLICATE",
            SchemaErrorCode::SchemaUnknown => "SCHEMA_UNKNOWN",
            SchemaErrorCode::SchemaIo => "SCHEMA_IO",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// What went wrong with a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Required field absent
    Missing,
    /// Value could not be read as the declared type
    TypeMismatch,
    /// `null` given for a non-nullable field
    NullValue,
    /// Undeclared field under a forbidding schema
    ExtraField,
}

/// Validation failure details
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDetails {
    /// Field path (e.g., "children[0].price")
    pub field: String,
    /// Kind of violation
    pub kind: ViolationKind,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(
        field: impl Into<String>,
        kind: ViolationKind,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            kind,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, ViolationKind::Missing, "field to be present", "missing")
    }

    pub fn extra_field(field: impl Into<String>) -> Self {
        Self::new(
            field,
            ViolationKind::ExtraField,
            "no undeclared fields",
            "extra field present",
        )
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(field, ViolationKind::TypeMismatch, expected, actual)
    }

    pub fn null_value(field: impl Into<String>) -> Self {
        Self::new(field, ViolationKind::NullValue, "non-null value", "null")
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// Result of validating a document: the normalized value or every violation found
pub type ValidationResult<T> = Result<T, Vec<ValidationDetails>>;

/// Schema error type with full context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    schema_name: Option<String>,
}

impl SchemaError {
    /// Create an error for a malformed schema file or definition
    pub fn malformed_schema(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::SchemaMalformed,
            message: format!("Malformed schema '{}': {}", source.into(), reason.into()),
            schema_name: None,
        }
    }

    /// Create a duplicate schema error
    pub fn duplicate(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: SchemaErrorCode::SchemaDuplicate,
            message: format!("Schema '{}' is already registered", name),
            schema_name: Some(name),
        }
    }

    /// Create an unknown schema error
    pub fn unknown_schema(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: SchemaErrorCode::SchemaUnknown,
            message: format!("Schema '{}' not found", name),
            schema_name: Some(name),
        }
    }

    /// Create an I/O error for a schema path
    pub fn io(path: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            code: SchemaErrorCode::SchemaIo,
            message: format!("Failed to read '{}': {}", path.into(), reason),
            schema_name: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the schema name if applicable
    pub fn schema_name(&self) -> Option<&str> {
        self.schema_name.as_deref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
