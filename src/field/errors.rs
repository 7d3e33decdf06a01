//! Field error types
//!
//! Error codes:
//! - FIELD_SCHEMA_VALIDATION_FAILED: value does not satisfy the schema
//! - FIELD_MALFORMED_ENCODING: stored or supplied text is not valid JSON
//! - FIELD_SERIALIZATION_FAILED: the encoder could not produce JSON
//! - FIELD_RECONSTRUCTION_FAILED: a deconstructed field could not be replayed
//!
//! Validation and malformed encoding are both user-facing validation
//! failures; `FieldError::is_validation` lets callers handle them in one place.

use std::fmt;
use thiserror::Error;

use crate::schema::ValidationDetails;

/// Result type for field operations
pub type FieldResult<T> = Result<T, FieldError>;

/// Field error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorCode {
    SchemaValidationFailed,
    MalformedEncoding,
    SerializationFailed,
    ReconstructionFailed,
}

impl FieldErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            FieldErrorCode::SchemaValidationFailed => "FIELD_SCHEMA_VALIDATION_FAILED",
            FieldErrorCode::MalformedEncoding => "FIELD_MALFORMED_ENCODING",
            FieldErrorCode::SerializationFailed => "FIELD_SERIALIZATION_FAILED",
            FieldErrorCode::ReconstructionFailed => "FIELD_RECONSTRUCTION_FAILED",
        }
    }
}

impl fmt::Display for FieldErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Field errors
#[derive(Debug, Clone, Error)]
pub enum FieldError {
    #[error("{model}: validation failed: {}", summarize(.errors))]
    SchemaValidation {
        model: String,
        errors: Vec<ValidationDetails>,
    },

    #[error("{model}: malformed JSON: {reason}")]
    MalformedEncoding { model: String, reason: String },

    #[error("{model}: serialization failed: {reason}")]
    Serialization { model: String, reason: String },

    #[error("cannot reconstruct field: {reason}")]
    Reconstruction { reason: String },
}

impl FieldError {
    pub fn validation(model: impl Into<String>, errors: Vec<ValidationDetails>) -> Self {
        FieldError::SchemaValidation {
            model: model.into(),
            errors,
        }
    }

    pub fn malformed(model: impl Into<String>, reason: impl fmt::Display) -> Self {
        FieldError::MalformedEncoding {
            model: model.into(),
            reason: reason.to_string(),
        }
    }

    pub fn serialization(model: impl Into<String>, reason: impl fmt::Display) -> Self {
        FieldError::Serialization {
            model: model.into(),
            reason: reason.to_string(),
        }
    }

    pub fn reconstruction(reason: impl Into<String>) -> Self {
        FieldError::Reconstruction {
            reason: reason.into(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> FieldErrorCode {
        match self {
            FieldError::SchemaValidation { .. } => FieldErrorCode::SchemaValidationFailed,
            FieldError::MalformedEncoding { .. } => FieldErrorCode::MalformedEncoding,
            FieldError::Serialization { .. } => FieldErrorCode::SerializationFailed,
            FieldError::Reconstruction { .. } => FieldErrorCode::ReconstructionFailed,
        }
    }

    /// True for errors caused by the supplied value rather than the field setup.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FieldError::SchemaValidation { .. } | FieldError::MalformedEncoding { .. }
        )
    }

    /// Field-level violations, empty for non-schema errors
    pub fn details(&self) -> &[ValidationDetails] {
        match self {
            FieldError::SchemaValidation { errors, .. } => errors,
            _ => &[],
        }
    }

    /// Whether any violation names the given field path.
    pub fn mentions(&self, field: &str) -> bool {
        self.details().iter().any(|d| d.field == field)
    }
}

fn summarize(errors: &[ValidationDetails]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
