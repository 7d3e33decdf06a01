//! CLI command implementations
//!
//! Commands read documents from stdin and write one JSON line per document
//! to stdout. `check` and `normalize` fail with `CLI_INVALID_INPUT` when any
//! document is rejected, after every document has been reported.

use std::io::{self, BufRead, Write};
use std::path::Path;

use serde_json::{json, Value};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::FieldOptions;
use crate::field::{encode_value, FieldError};
use crate::schema::{read_schema_file, Schema, SchemaLoader, SchemaValidator};

use super::args::{Command, SchemaSource};
use super::errors::{CliError, CliResult};
use super::io::{read_lines, write_field_error, write_response, write_text};

/// Parse arguments, set up logging, run the command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    init_logging(cli.verbose);
    run_command(cli.command)
}

/// Logs go to stderr so stdout stays machine readable.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "schemafield=debug"
    } else {
        "schemafield=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // a subscriber may already be installed by an embedding process
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match cmd {
        Command::Check { source, config } => {
            check(&source, config.as_deref(), stdin.lock(), &mut out)
        }
        Command::Normalize { source, config } => {
            normalize(&source, config.as_deref(), stdin.lock(), &mut out)
        }
        Command::Example { source } => example(&source, &mut out),
    };
    out.flush()?;
    result
}

/// Loads the schema named by the source.
pub fn load_schema(source: &SchemaSource) -> CliResult<Schema> {
    let schema = if source.schema.is_dir() {
        let name = source.name.as_deref().ok_or_else(|| {
            CliError::schema_error("--name is required when --schema is a directory")
        })?;
        let mut loader = SchemaLoader::new();
        let count = loader.load_dir(&source.schema)?;
        debug!(count, dir = %source.schema.display(), "loaded schema directory");
        loader.require(name)?.clone()
    } else {
        read_schema_file(&source.schema)?
    };

    if let Some(name) = &source.name {
        if &schema.name != name {
            return Err(CliError::schema_error(format!(
                "schema file defines '{}', not '{}'",
                schema.name, name
            )));
        }
    }
    Ok(schema)
}

fn load_options(path: Option<&Path>) -> CliResult<FieldOptions> {
    match path {
        Some(path) => Ok(FieldOptions::load(path)?),
        None => Ok(FieldOptions::default()),
    }
}

/// Parses and validates one document, returning its normalized form.
fn validate_line(schema: &Schema, options: &FieldOptions, line: &str) -> Result<Value, FieldError> {
    let document: Value =
        serde_json::from_str(line).map_err(|e| FieldError::malformed(&schema.name, e))?;

    SchemaValidator::new(schema)
        .with_mode(options.mode)
        .with_extra(options.extra)
        .validate(&document)
        .map_err(|errors| FieldError::validation(&schema.name, errors))
}

/// Validate each input document
pub fn check<R: BufRead, W: Write>(
    source: &SchemaSource,
    config: Option<&Path>,
    input: R,
    out: &mut W,
) -> CliResult<()> {
    let schema = load_schema(source)?;
    let options = load_options(config)?;

    process(&schema, &options, input, out, |out, line, _| {
        write_response(out, line, json!({ "valid": true }))
    })
}

/// Print the stored form of each input document
pub fn normalize<R: BufRead, W: Write>(
    source: &SchemaSource,
    config: Option<&Path>,
    input: R,
    out: &mut W,
) -> CliResult<()> {
    let schema = load_schema(source)?;
    let options = load_options(config)?;

    process(&schema, &options, input, out, |out, _, normalized| {
        let text = encode_value(&normalized, &options.encoder, &schema)?;
        write_text(out, &text)
    })
}

fn process<R, W, F>(
    schema: &Schema,
    options: &FieldOptions,
    input: R,
    out: &mut W,
    mut on_valid: F,
) -> CliResult<()>
where
    R: BufRead,
    W: Write,
    F: FnMut(&mut W, usize, Value) -> CliResult<()>,
{
    let mut total = 0;
    let mut rejected = 0;

    for entry in read_lines(input) {
        let (line_no, line) = entry?;
        total += 1;

        match validate_line(schema, options, &line) {
            Ok(normalized) => on_valid(out, line_no, normalized)?,
            Err(err) => {
                rejected += 1;
                write_field_error(out, line_no, &err)?;
            }
        }
    }

    info!(schema = %schema.name, total, rejected, "processed documents");
    if rejected > 0 {
        return Err(CliError::invalid_input(rejected, total));
    }
    Ok(())
}

/// Print an example document
pub fn example<W: Write>(source: &SchemaSource, out: &mut W) -> CliResult<()> {
    let schema = load_schema(source)?;
    let text = serde_json::to_string_pretty(&schema.example())?;
    write_text(out, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliErrorCode;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn write_product_schema(dir: &Path) -> SchemaSource {
        let path = dir.join("product.json");
        fs::write(
            &path,
            json!({
                "name": "ProductDefinition",
                "fields": {
                    "name": { "type": "string", "examples": ["Smart Watch"] },
                    "price": { "type": "float", "required": false, "nullable": true }
                }
            })
            .to_string(),
        )
        .unwrap();
        SchemaSource {
            schema: path,
            name: None,
        }
    }

    fn output_lines(out: &[u8]) -> Vec<Value> {
        String::from_utf8_lossy(out)
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_check_reports_each_line() {
        let tmp = TempDir::new().unwrap();
        let source = write_product_schema(tmp.path());
        let input = Cursor::new(
            "{\"name\": \"Watch\", \"price\": 9.99}\n{\"name\": \"Watch\", \"price\": \"free\"}\n{not json\n",
        );
        let mut out = Vec::new();

        let err = check(&source, None, input, &mut out).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::InvalidInput);

        let lines = output_lines(&out);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["status"], "ok");
        assert_eq!(lines[1]["errors"][0]["field"], "price");
        assert_eq!(lines[2]["code"], "FIELD_MALFORMED_ENCODING");
    }

    #[test]
    fn test_normalize_prints_stored_form() {
        let tmp = TempDir::new().unwrap();
        let source = write_product_schema(tmp.path());
        let input = Cursor::new("{\"name\": \"Watch\", \"price\": \"9.99\", \"colour\": \"red\"}\n");
        let mut out = Vec::new();

        normalize(&source, None, input, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"name\":\"Watch\",\"price\":9.99}\n"
        );
    }

    #[test]
    fn test_normalize_uses_config() {
        let tmp = TempDir::new().unwrap();
        let source = write_product_schema(tmp.path());
        let config = tmp.path().join("field.json");
        fs::write(&config, r#"{ "encoder": { "exclude_none": true } }"#).unwrap();
        let mut out = Vec::new();

        normalize(&source, Some(&config), Cursor::new("{\"name\": \"Watch\"}\n"), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"name\":\"Watch\"}\n");
    }

    #[test]
    fn test_directory_requires_name() {
        let tmp = TempDir::new().unwrap();
        write_product_schema(tmp.path());

        let mut source = SchemaSource {
            schema: tmp.path().to_path_buf(),
            name: None,
        };
        assert_eq!(load_schema(&source).unwrap_err().code(), &CliErrorCode::SchemaError);

        source.name = Some("ProductDefinition".into());
        assert_eq!(load_schema(&source).unwrap().name, "ProductDefinition");
    }

    #[test]
    fn test_example() {
        let tmp = TempDir::new().unwrap();
        let source = write_product_schema(tmp.path());
        let mut out = Vec::new();

        example(&source, &mut out).unwrap();
        let value: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value, json!({ "name": "Smart Watch" }));
    }
}
