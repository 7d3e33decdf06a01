//! Schema loader for reading schema files from disk
//!
//! - One schema per `.json` file
//! - Schemas are keyed by their `name`, which must be unique
//! - Malformed files fail the whole load

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;

/// Reads and checks a single schema file.
pub fn read_schema_file(path: &Path) -> SchemaResult<Schema> {
    let content =
        fs::read_to_string(path).map_err(|e| SchemaError::io(path.display().to_string(), e))?;

    let schema: Schema = serde_json::from_str(&content).map_err(|e| {
        SchemaError::malformed_schema(path.display().to_string(), format!("Invalid JSON: {}", e))
    })?;

    schema
        .validate_structure()
        .map_err(|e| SchemaError::malformed_schema(path.display().to_string(), e))?;

    Ok(schema)
}

/// In-memory schema registry, optionally populated from disk.
#[derive(Debug, Default)]
pub struct SchemaLoader {
    schemas: BTreeMap<String, Schema>,
}

impl SchemaLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads one schema file and registers it.
    pub fn load_file(&mut self, path: &Path) -> SchemaResult<&Schema> {
        let schema = read_schema_file(path)?;
        debug!(schema = %schema.name, path = %path.display(), "loaded schema file");
        self.register(schema)
    }

    /// Loads every `.json` file in a directory. Returns the number loaded.
    pub fn load_dir(&mut self, dir: &Path) -> SchemaResult<usize> {
        let entries = fs::read_dir(dir).map_err(|e| SchemaError::io(dir.display().to_string(), e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SchemaError::io(dir.display().to_string(), e))?;
            let path = entry.path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }

        // Directory order is platform dependent
        paths.sort();
        for path in &paths {
            self.load_file(path)?;
        }

        Ok(paths.len())
    }

    /// Registers a schema directly.
    pub fn register(&mut self, schema: Schema) -> SchemaResult<&Schema> {
        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema("<in-memory>", e))?;

        if self.schemas.contains_key(&schema.name) {
            return Err(SchemaError::duplicate(schema.name));
        }

        let name = schema.name.clone();
        Ok(self.schemas.entry(name).or_insert(schema))
    }

    /// Gets a schema by name.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Gets a schema by name, failing if it is not registered.
    pub fn require(&self, name: &str) -> SchemaResult<&Schema> {
        self.get(name).ok_or_else(|| SchemaError::unknown_schema(name))
    }

    /// Registered schema names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether no schema is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
