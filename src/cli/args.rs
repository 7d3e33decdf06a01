//! CLI argument definitions using clap
//!
//! Commands:
//! - schemafield check --schema <path> [--name <schema>] [--config <path>]
//! - schemafield normalize --schema <path> [--name <schema>] [--config <path>]
//! - schemafield example --schema <path> [--name <schema>]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// schemafield - validate and normalize structured JSON column values
#[derive(Parser, Debug)]
#[command(name = "schemafield")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log conversions to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Where to find the schema
#[derive(Args, Debug, Clone)]
pub struct SchemaSource {
    /// Schema file, or a directory of schema files
    #[arg(long)]
    pub schema: PathBuf,

    /// Schema name, required when --schema is a directory
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate JSON documents read line by line from stdin
    Check {
        #[command(flatten)]
        source: SchemaSource,

        /// Field options file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the stored form of each JSON document read from stdin
    Normalize {
        #[command(flatten)]
        source: SchemaSource,

        /// Field options file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print an example document built from the schema
    Example {
        #[command(flatten)]
        source: SchemaSource,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
