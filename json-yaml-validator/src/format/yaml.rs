//! YAML validation pipeline.
//!
//! Mirrors the JSON pipeline with two YAML rules: while YAML-as-JSON is on,
//! every YAML file is counted as skipped here before any exclusion check, and
//! a `---` stream that parses is accepted without schema validation.

use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::{FsSourceConfig, ValidationConfig};
use crate::error::{ConfigError, ErrorDetail, Violation};
use crate::exclude::Exclusion;
use crate::format::ExcludeGate;
use crate::report::{FileOutcome, ValidationResult};
use crate::schema::yaml::YamlSchema;
use crate::strategy::fs::{FileGlob, read_file_bounded, resolve_files};
use crate::strategy::{FileOwner, classify, normalize_path};

pub const INVALID_YAML: &str = "Invalid YAML";

/// A YAML run, with its schema and exclude rules compiled up front.
pub struct YamlPipeline<'a> {
    fs_config: &'a FsSourceConfig,
    config: &'a ValidationConfig,
    gate: ExcludeGate<'a>,
    schema: Option<YamlSchema>,
    schema_path: Option<String>,
}

impl<'a> YamlPipeline<'a> {
    /// # Errors
    ///
    /// Returns an error if the exclude regex or the schema cannot be compiled.
    pub fn new(
        fs_config: &'a FsSourceConfig,
        config: &'a ValidationConfig,
        exclude: &'a dyn Exclusion,
    ) -> Result<Self, ConfigError> {
        let gate = ExcludeGate::new(config.yaml.exclude_regex.as_deref(), exclude)?;
        let configured = config.yaml.schema.as_deref().filter(|p| !p.is_empty());
        let schema = configured
            .map(|path| YamlSchema::load(Path::new(path)))
            .transpose()?;
        if let Some(schema) = &schema {
            debug!("yaml schema loaded from {}", schema.path().display());
        }

        Ok(Self {
            fs_config,
            config,
            gate,
            schema,
            schema_path: configured.map(normalize_path),
        })
    }

    /// Resolve the candidate files and validate each one.
    ///
    /// # Errors
    ///
    /// Returns an error if the candidate files cannot be resolved.
    pub fn run(&self) -> Result<ValidationResult, ConfigError> {
        let glob = FileGlob::for_yaml(&self.config.extensions)?;
        debug!("yaml - using base_dir: {}", self.fs_config.base_dir.display());
        debug!("yaml - using glob: {glob}");
        let files = resolve_files(self.fs_config, &glob)?;

        let mut processed = HashSet::new();
        let mut result = ValidationResult::default();
        for path in &files {
            let outcome = self.process(path, &processed);
            // Only passed files enter the duplicate gate.
            if matches!(outcome, FileOutcome::Passed) {
                processed.insert(path.clone());
            }
            result.record(outcome);
        }
        Ok(result)
    }

    fn process(&self, path: &str, processed: &HashSet<String>) -> FileOutcome {
        debug!("found file: {path}");

        if self.schema_path.as_deref() == Some(path) {
            debug!("skipping yaml schema file: {path}");
            return FileOutcome::Ignored;
        }

        match classify(path, &self.config.extensions, self.config.yaml_as_json) {
            Some(FileOwner::Yaml) => {}
            Some(FileOwner::Json) => {
                debug!("the yaml-validator found a json file so it will be skipped here: '{path}'");
                return FileOutcome::Ignored;
            }
            Some(FileOwner::Both) => {
                debug!("skipping yaml since it should be treated as json: {path}");
                return FileOutcome::Skipped;
            }
            None => {
                debug!("the yaml-validator does not handle this file type: '{path}'");
                return FileOutcome::Ignored;
            }
        }

        if self.gate.excludes(path) {
            return FileOutcome::Skipped;
        }

        if processed.contains(path) {
            debug!("skipping duplicate file: {path}");
            return FileOutcome::Ignored;
        }

        let content = match read_file_bounded(Path::new(path), self.fs_config.max_file_size) {
            Ok(content) => content,
            Err(e) => return parse_failure(path, e.to_string()),
        };

        if self.config.allow_multiple_documents {
            return match serde_saphyr::from_multiple::<Value>(&content) {
                Ok(_) => {
                    info!("multiple documents found in file: {path}");
                    info!("{path} is valid");
                    FileOutcome::Passed
                }
                Err(e) => parse_failure(path, e.to_string()),
            };
        }

        let document = match serde_saphyr::from_str::<Value>(&content) {
            Ok(document) => document,
            Err(e) => return parse_failure(path, e.to_string()),
        };

        let errors = self
            .schema
            .as_ref()
            .map(|schema| schema.validate(&document))
            .unwrap_or_default();
        if errors.is_empty() {
            info!("{path} is valid");
            FileOutcome::Passed
        } else {
            error!(
                "\u{274c} failed to parse YAML file: {path}\n{}",
                serde_json::to_string(&errors).unwrap_or_default()
            );
            FileOutcome::Failed(Violation::new(path, errors))
        }
    }
}

fn parse_failure(path: &str, cause: String) -> FileOutcome {
    error!("\u{274c} failed to parse YAML file: {path}");
    FileOutcome::Failed(Violation::new(
        path,
        vec![ErrorDetail::unparsable(INVALID_YAML, cause)],
    ))
}

/// Validate YAML files on disk.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the run cannot start. Per-file failures are
/// reported in the returned result.
pub fn validate_yaml(
    fs_config: &FsSourceConfig,
    config: &ValidationConfig,
    exclude: &dyn Exclusion,
) -> Result<ValidationResult, ConfigError> {
    YamlPipeline::new(fs_config, config, exclude)?.run()
}
