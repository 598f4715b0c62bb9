//! JSON Schema compilation for the JSON pipeline.
//!
//! A schema is compiled once per run and reused for every document. Format
//! assertions are always on so that unknown and custom formats are resolved
//! at compile time; `use_formats` only decides whether the standard formats
//! assert anything.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::config::JsonConfig;
use crate::error::ConfigError;
use crate::schema::{SchemaDraft, SchemaIssue};

/// Format names the validator knows natively.
const STANDARD_FORMATS: &[&str] = &[
    "date",
    "date-time",
    "duration",
    "email",
    "hostname",
    "idn-email",
    "idn-hostname",
    "ipv4",
    "ipv6",
    "iri",
    "iri-reference",
    "json-pointer",
    "regex",
    "relative-json-pointer",
    "time",
    "uri",
    "uri-reference",
    "uri-template",
    "uuid",
];

/// A `name=regex` format registered for `format` keywords.
#[derive(Debug, Clone)]
pub struct CustomFormat {
    pub name: String,
    pub regex: Regex,
}

impl FromStr for CustomFormat {
    type Err = ConfigError;

    /// Parse `name=regex`. The name is `[\w-]+`; the regex is everything after
    /// the first `=`.
    fn from_str(entry: &str) -> Result<Self, Self::Err> {
        let entry = entry.trim();
        let not_expected = || ConfigError::NotInExpectedFormat {
            entry: entry.to_owned(),
        };

        let (name, pattern) = entry.split_once('=').ok_or_else(not_expected)?;
        let name_ok = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-');
        if !name_ok || pattern.is_empty() {
            return Err(not_expected());
        }

        let regex = Regex::new(pattern)
            .map_err(|source| ConfigError::InvalidRegularExpression { source })?;
        Ok(Self {
            name: name.to_owned(),
            regex,
        })
    }
}

/// A compiled JSON Schema bound to one dialect.
#[derive(Debug)]
pub struct CompiledSchema {
    validator: jsonschema::Validator,
    draft: SchemaDraft,
}

impl CompiledSchema {
    /// Compile the schema named by `config.schema`, or the accept-anything
    /// schema when none is configured.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed or non-compiling custom formats, an
    /// unreadable or unparsable schema file, or a schema that does not compile
    /// (including `format` values that are neither standard nor registered,
    /// when strict mode is on).
    pub fn compile(config: &JsonConfig) -> Result<Self, ConfigError> {
        match config.schema.as_deref().filter(|path| !path.is_empty()) {
            Some(path) => {
                let path = PathBuf::from(path);
                let content = std::fs::read_to_string(&path).map_err(|source| {
                    ConfigError::SchemaRead {
                        path: path.clone(),
                        source,
                    }
                })?;
                let schema: Value =
                    serde_json::from_str(&content).map_err(|e| ConfigError::SchemaParse {
                        path: path.clone(),
                        message: e.to_string(),
                    })?;
                Self::from_value(&schema, config, &path)
            }
            None => Self::from_value(&Value::Bool(true), config, Path::new("<accept-all>")),
        }
    }

    /// Compile an in-memory schema body. `origin` names it in errors.
    ///
    /// # Errors
    ///
    /// See [`CompiledSchema::compile`].
    pub fn from_value(schema: &Value, config: &JsonConfig, origin: &Path) -> Result<Self, ConfigError> {
        let draft = SchemaDraft::select(&config.schema_version);
        debug!("json_schema_version: {draft}");
        debug!("strict: {}", config.strict);

        let custom_formats = config
            .custom_formats
            .iter()
            .filter(|entry| !entry.trim().is_empty())
            .map(|entry| entry.parse::<CustomFormat>())
            .collect::<Result<Vec<_>, _>>()?;

        let mut options = jsonschema::options()
            .with_draft(draft.to_jsonschema())
            .should_validate_formats(true)
            .should_ignore_unknown_formats(!config.strict);

        if config.use_formats {
            debug!("using standard format assertions with the json validator");
        } else {
            debug!("standard format assertions will not be used with the json validator");
            for name in STANDARD_FORMATS {
                options = options.with_format(*name, |_: &str| true);
            }
        }

        for format in custom_formats {
            debug!("registering custom format: {}", format.name);
            let regex = format.regex;
            options = options.with_format(format.name, move |value: &str| regex.is_match(value));
        }

        let validator = options
            .build(schema)
            .map_err(|e| ConfigError::SchemaCompile {
                path: origin.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(Self { validator, draft })
    }

    #[must_use]
    pub fn draft(&self) -> SchemaDraft {
        self.draft
    }

    /// Validate one document. An empty list means it is valid.
    #[must_use]
    pub fn validate(&self, document: &Value) -> Vec<SchemaIssue> {
        self.validator
            .iter_errors(document)
            .map(|error| SchemaIssue {
                instance_path: error.instance_path().to_string(),
                message: error.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> JsonConfig {
        JsonConfig::default()
    }

    #[test]
    fn test_accept_anything_when_no_schema() {
        let schema = CompiledSchema::compile(&config()).unwrap();
        assert_eq!(schema.draft(), SchemaDraft::Draft07);
        for doc in [json!({}), json!([1, 2]), json!("text"), json!(null), json!({"a": {"b": 1}})] {
            assert!(schema.validate(&doc).is_empty());
        }
    }

    #[test]
    fn test_errors_carry_instance_path() {
        let schema_body = json!({
            "type": "object",
            "properties": {"foo": {"type": "string"}},
            "required": ["foo"]
        });
        let schema = CompiledSchema::from_value(&schema_body, &config(), Path::new("s.json")).unwrap();

        let issues = schema.validate(&json!({"foo": 1}));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].instance_path, "/foo");

        let missing = schema.validate(&json!({}));
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].instance_path, "");
        assert!(missing[0].message.contains("foo"));
    }

    #[test]
    fn test_all_errors_reported() {
        let schema_body = json!({
            "type": "object",
            "properties": {"a": {"type": "string"}, "b": {"type": "integer"}}
        });
        let schema = CompiledSchema::from_value(&schema_body, &config(), Path::new("s.json")).unwrap();
        assert_eq!(schema.validate(&json!({"a": 1, "b": "x"})).len(), 2);
    }

    #[test]
    fn test_custom_format_is_asserted() {
        let mut cfg = config();
        cfg.custom_formats = vec!["lowercase_char=^[a-z]$".to_owned()];
        let schema_body = json!({"type": "string", "format": "lowercase_char"});
        let schema = CompiledSchema::from_value(&schema_body, &cfg, Path::new("s.json")).unwrap();
        assert!(schema.validate(&json!("a")).is_empty());
        assert_eq!(schema.validate(&json!("AB")).len(), 1);
    }

    #[test]
    fn test_custom_format_value_may_contain_equals() {
        let format: CustomFormat = "kv=^a=b$".parse().unwrap();
        assert_eq!(format.name, "kv");
        assert!(format.regex.is_match("a=b"));
    }

    #[test]
    fn test_custom_format_shape_error() {
        let err = "no-equals-sign".parse::<CustomFormat>().unwrap_err();
        assert!(matches!(err, ConfigError::NotInExpectedFormat { .. }));

        let err = "bad name=abc".parse::<CustomFormat>().unwrap_err();
        assert!(matches!(err, ConfigError::NotInExpectedFormat { .. }));
    }

    #[test]
    fn test_custom_format_invalid_regex() {
        let mut cfg = config();
        cfg.custom_formats = vec!["broken=([a-z]".to_owned()];
        let err = CompiledSchema::compile(&cfg).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRegularExpression { .. }));
    }

    #[test]
    fn test_unknown_format_is_fatal_in_strict_mode() {
        let schema_body = json!({"type": "string", "format": "not-a-real-format"});
        let err = CompiledSchema::from_value(&schema_body, &config(), Path::new("s.json")).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaCompile { .. }));

        let mut relaxed = config();
        relaxed.strict = false;
        assert!(CompiledSchema::from_value(&schema_body, &relaxed, Path::new("s.json")).is_ok());
    }

    #[test]
    fn test_standard_formats_toggle() {
        let schema_body = json!({"type": "string", "format": "email"});
        let strict_formats = CompiledSchema::from_value(&schema_body, &config(), Path::new("s.json")).unwrap();
        assert_eq!(strict_formats.validate(&json!("not an email")).len(), 1);

        let mut cfg = config();
        cfg.use_formats = false;
        let no_formats = CompiledSchema::from_value(&schema_body, &cfg, Path::new("s.json")).unwrap();
        assert!(no_formats.validate(&json!("not an email")).is_empty());
    }

    #[test]
    fn test_missing_schema_file() {
        let mut cfg = config();
        cfg.schema = Some("definitely/not/here.json".to_owned());
        let err = CompiledSchema::compile(&cfg).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaRead { .. }));
    }
}
