//! Field configuration
//!
//! Options may be built in code or loaded from a JSON file:
//!
//! ```json
//! {
//!   "mode": "lax",
//!   "extra": "forbid",
//!   "encoder": { "indent": 2, "exclude_none": true }
//! }
//! ```
//!
//! Every key is optional.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::field::EncoderOptions;
use crate::schema::{ExtraFields, ValidationMode};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{path}': {reason}")]
    Parse { path: String, reason: String },
}

/// Per-field behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldOptions {
    /// Scalar coercion mode
    pub mode: ValidationMode,
    /// Overrides the schema's root extra key policy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<ExtraFields>,
    /// Options for the default encoder
    pub encoder: EncoderOptions,
}

impl FieldOptions {
    /// Strict options: exact JSON types, undeclared keys rejected.
    pub fn strict() -> Self {
        Self {
            mode: ValidationMode::Strict,
            extra: Some(ExtraFields::Forbid),
            ..Self::default()
        }
    }

    pub fn with_encoder(mut self, encoder: EncoderOptions) -> Self {
        self.encoder = encoder;
        self
    }

    /// Parses options from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse {
            path: "<inline>".into(),
            reason: e.to_string(),
        })
    }

    /// Loads options from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
