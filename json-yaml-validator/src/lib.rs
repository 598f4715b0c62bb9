//! # json-yaml-validator
//!
//! Validation engine for JSON and YAML files in a repository checkout.
//!
//! The crate separates **input strategies** (how candidate files are found on
//! disk) from the **pipelines** that judge each file: exclusion, parsing,
//! JSON Schema validation, and aggregation into a single verdict.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use json_yaml_validator::{
//!     ExcludeConfig, FsSourceConfig, Mode, PatternMatcher, ValidationConfig,
//!     process_results, validate_json, validate_yaml,
//! };
//!
//! let mut fs_config = FsSourceConfig::default();
//! fs_config.base_dir = PathBuf::from("config");
//!
//! let mut validation_config = ValidationConfig::default();
//! validation_config.json.schema = Some("schemas/config.json".to_owned());
//!
//! let matcher = PatternMatcher::load(&ExcludeConfig::default()).unwrap();
//! let json = validate_json(&fs_config, &validation_config, &matcher).unwrap();
//! let yaml = validate_yaml(&fs_config, &validation_config, &matcher).unwrap();
//!
//! let verdict = process_results(&json, &yaml, &Mode::Fail);
//! println!("JSON passed: {}, failed: {}", json.passed, json.failed);
//! println!("success: {}", verdict.success);
//! ```

mod aggregate;
mod config;
mod error;
mod exclude;
mod format;
pub mod output;
mod report;
mod schema;
mod strategy;

pub use aggregate::{Mode, Verdict, check_results, process_results};
pub use config::{
    ExcludeConfig, Extensions, FsSourceConfig, JsonConfig, ValidationConfig, YamlConfig,
};
pub use error::{ConfigError, ErrorDetail, Violation};
pub use exclude::{ExcludeDecision, Exclusion, PatternMatcher, RuleKind};
pub use format::json::{JsonPipeline, validate_json};
pub use format::yaml::{YamlPipeline, validate_yaml};
pub use report::{FileOutcome, ValidationResult};
pub use schema::SchemaDraft;
pub use schema::json::{CompiledSchema, CustomFormat};
pub use schema::yaml::YamlSchema;
pub use strategy::{FileOwner, classify, normalize_path};
