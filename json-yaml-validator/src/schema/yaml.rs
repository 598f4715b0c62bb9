//! Whole-file schema checks for YAML.
//!
//! The schema is a JSON Schema body written in YAML (or JSON, which YAML
//! reads as well). It is compiled once and applied to the single document of
//! each YAML file; failures are reported with dotted paths such as `person.age`.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{ConfigError, ErrorDetail};

/// A compiled YAML schema.
#[derive(Debug)]
pub struct YamlSchema {
    path: PathBuf,
    validator: jsonschema::Validator,
}

impl YamlSchema {
    /// Read, parse and compile the schema at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not YAML, or does not
    /// compile as a schema.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::SchemaRead {
            path: path.to_path_buf(),
            source,
        })?;
        let body = serde_saphyr::from_str::<Value>(&content).map_err(|e| ConfigError::SchemaParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_value(&body, path)
    }

    /// Compile an in-memory schema body. `origin` names it in errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the body does not compile as a schema.
    pub fn from_value(body: &Value, origin: &Path) -> Result<Self, ConfigError> {
        let validator = jsonschema::validator_for(body).map_err(|e| ConfigError::SchemaCompile {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self {
            path: origin.to_path_buf(),
            validator,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check one parsed document. An empty list means it is valid.
    #[must_use]
    pub fn validate(&self, document: &Value) -> Vec<ErrorDetail> {
        self.validator
            .iter_errors(document)
            .map(|error| {
                ErrorDetail::new(
                    dotted_path(&error.instance_path().to_string()),
                    error.to_string(),
                )
            })
            .collect()
    }
}

/// Turn a JSON pointer into a dotted path. The root maps to `None`.
#[must_use]
pub fn dotted_path(pointer: &str) -> Option<String> {
    let trimmed = pointer.trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    let segments: Vec<String> = trimmed
        .split('/')
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect();
    Some(segments.join("."))
}
