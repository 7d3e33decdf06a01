//! CLI module for schemafield
//!
//! Provides command-line access to schema validation:
//! - check: validate documents against a schema
//! - normalize: print the stored form of documents
//! - example: print an example document

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, SchemaSource};
pub use commands::{check, example, load_schema, normalize, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
