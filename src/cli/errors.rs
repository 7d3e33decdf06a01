//! CLI-specific error types

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::schema::SchemaError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// Schema could not be loaded
    SchemaError,
    /// I/O error (stdin/stdout)
    IoError,
    /// One or more input documents were rejected
    InvalidInput,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "CLI_CONFIG_ERROR",
            Self::SchemaError => "CLI_SCHEMA_ERROR",
            Self::IoError => "CLI_IO_ERROR",
            Self::InvalidInput => "CLI_INVALID_INPUT",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// Schema error
    pub fn schema_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::SchemaError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Rejected documents
    pub fn invalid_input(rejected: usize, total: usize) -> Self {
        Self::new(
            CliErrorCode::InvalidInput,
            format!("{} of {} documents rejected", rejected, total),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::schema_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_has_code() {
        let err = CliError::invalid_input(2, 5);
        assert_eq!(err.to_string(), "CLI_INVALID_INPUT: 2 of 5 documents rejected");
    }

    #[test]
    fn test_schema_error_converts() {
        let err: CliError = SchemaError::unknown_schema("Missing").into();
        assert_eq!(err.code(), &CliErrorCode::SchemaError);
        assert!(err.message().contains("Missing"));
    }
}
