//! Error types for JSON and YAML validation.
//!
//! Two layers:
//! - [`ConfigError`]: the run cannot start (bad regex, unreadable schema, missing
//!   required exclude file). These propagate to the caller and abort the run.
//! - [`Violation`] / [`ErrorDetail`]: a single file failed to parse or did not
//!   match its schema. These are counted in the result and never returned as `Err`.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// A configuration error that aborts the run before any file is processed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A custom format entry is not shaped like `name=regex`.
    #[error(
        "Invalid ajv_custom_regexp_formats format: \"{entry}\" is not in expected format \"key=regex\""
    )]
    NotInExpectedFormat { entry: String },

    /// A custom format regex does not compile.
    #[error("Invalid regular expression: {source}")]
    InvalidRegularExpression {
        #[source]
        source: regex::Error,
    },

    /// The schema file could not be read.
    #[error("Failed to read schema file {}: {source}", path.display())]
    SchemaRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The schema file is not valid JSON/YAML.
    #[error("Failed to parse schema file {}: {message}", path.display())]
    SchemaParse { path: PathBuf, message: String },

    /// The schema body could not be compiled (invalid keyword value, unknown format, ...).
    #[error("Failed to compile schema {}: {message}", path.display())]
    SchemaCompile { path: PathBuf, message: String },

    /// The exclude file does not exist and `exclude_file_required` is set.
    #[error("Exclude file not found: {}", path.display())]
    ExcludeFileNotFound { path: PathBuf },

    /// The exclude file exists but could not be read.
    #[error("Failed to read exclude file {}: {source}", path.display())]
    ExcludeFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of the exclude file is not a valid pattern.
    #[error("Invalid exclude pattern '{pattern}': {message}")]
    InvalidExcludePattern { pattern: String, message: String },

    /// `json_exclude_regex` / `yaml_exclude_regex` does not compile.
    #[error("Invalid exclude regex '{pattern}': {source}")]
    InvalidExcludeRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A glob pattern from the `files` list (or a derived crawl pattern) is invalid.
    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// `base_dir` does not exist and no explicit file list was given.
    #[error("Base directory does not exist: {}", path.display())]
    BaseDirNotFound { path: PathBuf },
}

/// One failure inside a file.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct ErrorDetail {
    /// Location of the failing instance; `None` for parse failures and root-level errors.
    pub path: Option<String>,
    /// Human-readable description.
    pub message: String,
    /// Index of the failing document, present only in multi-document mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<usize>,
    /// Underlying parser or I/O message, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorDetail {
    #[must_use]
    pub fn new(path: Option<String>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            document: None,
            error: None,
        }
    }

    /// An unaddressable failure (parse or read error) with its cause attached.
    #[must_use]
    pub fn unparsable(message: &str, cause: impl Into<String>) -> Self {
        Self {
            path: None,
            message: message.to_owned(),
            document: None,
            error: Some(cause.into()),
        }
    }

    #[must_use]
    pub fn in_document(mut self, index: usize) -> Self {
        self.document = Some(index);
        self
    }
}

/// The record of one failed file, bundling every error found in it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct Violation {
    /// Normalized path of the failed file.
    pub file: String,
    pub errors: Vec<ErrorDetail>,
}

impl Violation {
    #[must_use]
    pub fn new(file: impl Into<String>, errors: Vec<ErrorDetail>) -> Self {
        Self {
            file: file.into(),
            errors,
        }
    }

    /// Format the violation for human-readable output, one line per error.
    ///
    /// `{file}: {message} (at {path})`, with the document index when present.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        self.errors
            .iter()
            .map(|e| {
                let location = e
                    .path
                    .as_ref()
                    .map(|p| format!(" (at {p})"))
                    .unwrap_or_default();
                let document = e
                    .document
                    .map(|d| format!(" [document {d}]"))
                    .unwrap_or_default();
                let cause = e
                    .error
                    .as_ref()
                    .map(|c| format!(": {c}"))
                    .unwrap_or_default();
                format!("{}: {}{location}{document}{cause}", self.file, e.message)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_serializes_null_path() {
        let detail = ErrorDetail::new(None, "Invalid JSON");
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json, serde_json::json!({"path": null, "message": "Invalid JSON"}));
    }

    #[test]
    fn test_error_detail_document_index_serialized_when_set() {
        let detail = ErrorDetail::new(Some("/foo".to_owned()), "bad").in_document(1);
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["document"], 1);
        assert_eq!(json["path"], "/foo");
    }

    #[test]
    fn test_format_violation_with_path_and_document() {
        let violation = Violation::new(
            "config/app.yaml",
            vec![
                ErrorDetail::new(Some("/name".to_owned()), "42 is not of type \"string\"")
                    .in_document(2),
            ],
        );
        let formatted = violation.format_human_readable();
        assert!(formatted.contains("config/app.yaml"));
        assert!(formatted.contains("(at /name)"));
        assert!(formatted.contains("[document 2]"));
    }

    #[test]
    fn test_format_violation_parse_error() {
        let violation = Violation::new(
            "bad.json",
            vec![ErrorDetail::unparsable("Invalid JSON", "expected value at line 1")],
        );
        let formatted = violation.format_human_readable();
        assert_eq!(formatted, "bad.json: Invalid JSON: expected value at line 1");
        assert!(!formatted.contains("(at"));
    }

    #[test]
    fn test_custom_format_error_message() {
        let err = ConfigError::NotInExpectedFormat {
            entry: "nope".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid ajv_custom_regexp_formats format: \"nope\" is not in expected format \"key=regex\""
        );
    }
}
