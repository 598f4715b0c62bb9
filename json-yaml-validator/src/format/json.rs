//! JSON validation pipeline.
//!
//! Each candidate passes, in order: schema self-skip, exclude regex, exclude
//! rules, ownership, duplicate gate, parse, schema validation. YAML files reach
//! the parse stage only while YAML-as-JSON is on.

use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::{FsSourceConfig, ValidationConfig};
use crate::error::{ConfigError, ErrorDetail, Violation};
use crate::exclude::Exclusion;
use crate::format::ExcludeGate;
use crate::report::{FileOutcome, ValidationResult};
use crate::schema::json::CompiledSchema;
use crate::strategy::fs::{FileGlob, read_file_bounded, resolve_files};
use crate::strategy::{FileOwner, classify, normalize_path};

pub const INVALID_JSON: &str = "Invalid JSON";

/// A JSON run, with its schema and exclude rules compiled up front.
pub struct JsonPipeline<'a> {
    fs_config: &'a FsSourceConfig,
    config: &'a ValidationConfig,
    gate: ExcludeGate<'a>,
    schema: CompiledSchema,
    schema_path: Option<String>,
}

impl<'a> JsonPipeline<'a> {
    /// # Errors
    ///
    /// Returns an error if the exclude regex, a custom format or the schema
    /// cannot be compiled.
    pub fn new(
        fs_config: &'a FsSourceConfig,
        config: &'a ValidationConfig,
        exclude: &'a dyn Exclusion,
    ) -> Result<Self, ConfigError> {
        debug!("yaml_as_json: {}", config.yaml_as_json);
        let gate = ExcludeGate::new(config.json.exclude_regex.as_deref(), exclude)?;
        let schema = CompiledSchema::compile(&config.json)?;
        debug!("json schema compiled with dialect {}", schema.draft());
        let schema_path = config
            .json
            .schema
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(normalize_path);

        Ok(Self {
            fs_config,
            config,
            gate,
            schema,
            schema_path,
        })
    }

    /// Resolve the candidate files and validate each one.
    ///
    /// # Errors
    ///
    /// Returns an error if the candidate files cannot be resolved.
    pub fn run(&self) -> Result<ValidationResult, ConfigError> {
        let glob = FileGlob::for_json(&self.config.extensions, self.config.yaml_as_json)?;
        debug!("json - using base_dir: {}", self.fs_config.base_dir.display());
        debug!("json - using glob: {glob}");
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

        if let Some(schema_path) = &self.schema_path
            && path.contains(schema_path.as_str())
        {
            debug!("skipping json schema file: {path}");
            return FileOutcome::Ignored;
        }

        if self.gate.excludes(path) {
            return FileOutcome::Skipped;
        }

        let owner = match classify(path, &self.config.extensions, self.config.yaml_as_json) {
            Some(FileOwner::Yaml) => {
                debug!("the json-validator found a yaml file so it will be skipped here: '{path}'");
                return FileOutcome::Ignored;
            }
            None => {
                debug!("the json-validator does not handle this file type: '{path}'");
                return FileOutcome::Ignored;
            }
            Some(owner) => owner,
        };

        if processed.contains(path) {
            debug!("skipping duplicate file: {path}");
            return FileOutcome::Ignored;
        }

        let documents = match self.parse(path, owner) {
            Ok(documents) => documents,
            Err(cause) => {
                error!("\u{274c} failed to parse JSON file: {path}");
                return FileOutcome::Failed(Violation::new(
                    path,
                    vec![ErrorDetail::unparsable(INVALID_JSON, cause)],
                ));
            }
        };
        debug!("{} object(s) found in file: {path}", documents.len());

        let tag_documents = owner == FileOwner::Both && self.config.allow_multiple_documents;
        let errors: Vec<ErrorDetail> = documents
            .iter()
            .enumerate()
            .flat_map(|(index, document)| {
                self.schema.validate(document).into_iter().map(move |issue| {
                    let pointer = Some(issue.instance_path).filter(|p| !p.is_empty());
                    let detail = ErrorDetail::new(pointer, issue.message);
                    if tag_documents {
                        detail.in_document(index)
                    } else {
                        detail
                    }
                })
            })
            .collect();

        if errors.is_empty() {
            info!("{path} is valid");
            FileOutcome::Passed
        } else {
            error!(
                "\u{274c} failed to parse JSON file: {path}\n{}",
                serde_json::to_string(&errors).unwrap_or_default()
            );
            FileOutcome::Failed(Violation::new(path, errors))
        }
    }

    /// Read and parse a file into its documents. JSON files always yield one.
    fn parse(&self, path: &str, owner: FileOwner) -> Result<Vec<Value>, String> {
        let content = read_file_bounded(Path::new(path), self.fs_config.max_file_size)
            .map_err(|e| e.to_string())?;

        if owner != FileOwner::Both {
            return serde_json::from_str(&content)
                .map(|document| vec![document])
                .map_err(|e| e.to_string());
        }

        debug!("attempting to process yaml file: '{path}' as json");
        if self.config.allow_multiple_documents {
            serde_saphyr::from_multiple(&content).map_err(|e| e.to_string())
        } else {
            serde_saphyr::from_str(&content)
                .map(|document| vec![document])
                .map_err(|e| e.to_string())
        }
    }
}

/// Validate JSON files on disk.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the run cannot start. Per-file failures are
/// reported in the returned result.
pub fn validate_json(
    fs_config: &FsSourceConfig,
    config: &ValidationConfig,
    exclude: &dyn Exclusion,
) -> Result<ValidationResult, ConfigError> {
    JsonPipeline::new(fs_config, config, exclude)?.run()
}
