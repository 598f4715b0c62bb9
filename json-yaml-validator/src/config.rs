//! Configuration types for JSON and YAML validation.
//!
//! Split into source-specific config (how candidate files are discovered) and
//! validation config (how each discovered file is judged). This keeps the
//! pipelines free of filesystem crawling concerns.

use std::path::PathBuf;

/// File extensions that decide which pipeline owns a file.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Extensions {
    /// JSON extension, including the leading dot (default: `.json`).
    pub json: String,
    /// Long YAML extension (default: `.yaml`).
    pub yaml: String,
    /// Short YAML extension (default: `.yml`).
    pub yaml_short: String,
}

impl Default for Extensions {
    fn default() -> Self {
        Self {
            json: ".json".to_owned(),
            yaml: ".yaml".to_owned(),
            yaml_short: ".yml".to_owned(),
        }
    }
}

/// Filesystem-specific source options.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct FsSourceConfig {
    /// Directory crawled when `files` is empty (default: `.`).
    pub base_dir: PathBuf,
    /// Explicit glob patterns. When non-empty, `base_dir` is not crawled.
    pub files: Vec<String>,
    /// Whether dot-directories and dot-files are matched (default: `true`).
    pub use_dot_match: bool,
    /// Whether to follow symbolic links while crawling.
    ///
    /// **Defaults to `false`** so a crawl cannot escape the base directory.
    pub follow_links: bool,
    /// Maximum directory traversal depth (default: 64).
    pub max_depth: usize,
    /// Maximum file size in bytes (default: 10 MB). Larger files fail validation.
    pub max_file_size: u64,
}

impl Default for FsSourceConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            files: Vec::new(),
            use_dot_match: true,
            follow_links: false,
            max_depth: 64,
            max_file_size: 10_485_760,
        }
    }
}

/// JSON pipeline options.
#[derive(Debug, Clone)]
#[non_exhaustive]
#[allow(clippy::struct_excessive_bools)]
pub struct JsonConfig {
    /// Path to the JSON Schema file. `None` accepts any document.
    pub schema: Option<String>,
    /// Requested schema dialect (`draft-04`, `draft-07`, `draft-2019-09`, `draft-2020-12`).
    pub schema_version: String,
    /// Treat unknown `format` values as fatal schema errors (default: `true`).
    pub strict: bool,
    /// Assert the standard formats (`email`, `date-time`, ...) (default: `true`).
    pub use_formats: bool,
    /// Extra formats as `name=regex` entries.
    pub custom_formats: Vec<String>,
    /// Files whose path matches this regex are skipped.
    pub exclude_regex: Option<String>,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            schema: None,
            schema_version: "draft-07".to_owned(),
            strict: true,
            use_formats: true,
            custom_formats: Vec::new(),
            exclude_regex: None,
        }
    }
}

/// YAML pipeline options.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct YamlConfig {
    /// Path to the schema applied to single-document YAML files.
    pub schema: Option<String>,
    /// Files whose path matches this regex are skipped.
    pub exclude_regex: Option<String>,
}

/// Core validation config shared by both pipelines.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct ValidationConfig {
    pub extensions: Extensions,
    /// Route every YAML file through the JSON pipeline.
    pub yaml_as_json: bool,
    /// Parse YAML files as `---`-separated document streams.
    pub allow_multiple_documents: bool,
    pub json: JsonConfig,
    pub yaml: YamlConfig,
}

/// Where exclude patterns come from.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ExcludeConfig {
    /// Ignore-style pattern file.
    pub exclude_file: Option<PathBuf>,
    /// Fail the run when `exclude_file` does not exist (default: `false`).
    pub exclude_file_required: bool,
    /// Merge the VCS-ignore file into the exclusion rules (default: `true`).
    pub use_gitignore: bool,
    /// Location of the VCS-ignore file (default: `.gitignore`).
    pub gitignore_path: PathBuf,
}

impl Default for ExcludeConfig {
    fn default() -> Self {
        Self {
            exclude_file: None,
            exclude_file_required: false,
            use_gitignore: true,
            gitignore_path: PathBuf::from(".gitignore"),
        }
    }
}
