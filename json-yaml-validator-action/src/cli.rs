use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::bail;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use tracing::{debug, warn};

use json_yaml_validator::output::{write_comment, write_human};
use json_yaml_validator::{
    ExcludeConfig, FsSourceConfig, Mode, PatternMatcher, ValidationConfig, ValidationResult,
    process_results, validate_json, validate_yaml,
};

use crate::comment::{PullRequest, post_comment};
use crate::logging;
use crate::outputs::set_output;

/// Validate JSON and YAML files in a repository.
///
/// Every option can also be set through the `INPUT_<NAME>` environment
/// variable the workflow runner provides for action inputs.
#[derive(Parser, Debug)]
#[command(name = "json-yaml-validate", version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Directory searched for files when `files` is empty.
    #[arg(long, env = "INPUT_BASE_DIR", default_value = ".")]
    pub base_dir: PathBuf,

    /// Glob patterns to validate instead of crawling, newline or comma separated.
    #[arg(long, env = "INPUT_FILES", default_value = "")]
    pub files: String,

    /// Match dot-directories and dot-files.
    #[arg(long, env = "INPUT_USE_DOT_MATCH", default_value = "true", action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub use_dot_match: bool,

    #[arg(long, env = "INPUT_JSON_EXTENSION", default_value = ".json")]
    pub json_extension: String,

    /// Skip JSON files whose path matches this regex.
    #[arg(long, env = "INPUT_JSON_EXCLUDE_REGEX", default_value = "")]
    pub json_exclude_regex: String,

    /// JSON Schema applied to every JSON document.
    #[arg(long, env = "INPUT_JSON_SCHEMA", default_value = "")]
    pub json_schema: String,

    /// draft-04, draft-07, draft-2019-09 or draft-2020-12.
    #[arg(long, env = "INPUT_JSON_SCHEMA_VERSION", default_value = "draft-07")]
    pub json_schema_version: String,

    /// Treat unknown `format` values in the schema as errors.
    #[arg(long, env = "INPUT_AJV_STRICT_MODE", default_value = "true", action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub ajv_strict_mode: bool,

    /// Assert the standard formats (email, date-time, ...).
    #[arg(long, env = "INPUT_USE_AJV_FORMATS", default_value = "true", action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub use_ajv_formats: bool,

    /// Extra `name=regex` formats, one per line.
    #[arg(long, env = "INPUT_AJV_CUSTOM_REGEXP_FORMATS", default_value = "")]
    pub ajv_custom_regexp_formats: String,

    #[arg(long, env = "INPUT_YAML_EXTENSION", default_value = ".yaml")]
    pub yaml_extension: String,

    #[arg(long, env = "INPUT_YAML_EXTENSION_SHORT", default_value = ".yml")]
    pub yaml_extension_short: String,

    /// Skip YAML files whose path matches this regex.
    #[arg(long, env = "INPUT_YAML_EXCLUDE_REGEX", default_value = "")]
    pub yaml_exclude_regex: String,

    /// Schema applied to single-document YAML files.
    #[arg(long, env = "INPUT_YAML_SCHEMA", default_value = "")]
    pub yaml_schema: String,

    /// Validate YAML files with the JSON pipeline.
    #[arg(long, env = "INPUT_YAML_AS_JSON", default_value = "false", action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub yaml_as_json: bool,

    /// Accept `---` separated YAML streams.
    #[arg(long, env = "INPUT_ALLOW_MULTIPLE_DOCUMENTS", default_value = "false", action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub allow_multiple_documents: bool,

    /// File with gitignore-style exclude patterns.
    #[arg(long, env = "INPUT_EXCLUDE_FILE", default_value = "")]
    pub exclude_file: String,

    /// Fail when `exclude_file` does not exist.
    #[arg(long, env = "INPUT_EXCLUDE_FILE_REQUIRED", default_value = "false", action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub exclude_file_required: bool,

    /// Also exclude what the VCS-ignore file ignores.
    #[arg(long, env = "INPUT_USE_GITIGNORE", default_value = "true", action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub use_gitignore: bool,

    #[arg(long, env = "INPUT_GIT_IGNORE_PATH", default_value = ".gitignore")]
    pub git_ignore_path: PathBuf,

    /// `fail` or `warn`. Anything else fails with a warning.
    #[arg(long, env = "INPUT_MODE", default_value = "fail")]
    pub mode: String,

    /// Comment on the pull request when validation fails.
    #[arg(long, env = "INPUT_COMMENT", default_value = "false", action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub comment: bool,

    /// Token used to post the pull request comment.
    #[arg(long, env = "INPUT_GITHUB_TOKEN", default_value = "", hide_env_values = true)]
    pub github_token: String,
}

/// Split a multi-valued input on newlines (and commas when `commas` is set),
/// trimming entries and dropping empty ones.
fn split_list(raw: &str, commas: bool) -> Vec<String> {
    raw.split(|c| c == '\n' || (commas && c == ','))
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

impl Args {
    /// Reject combinations that cannot work.
    ///
    /// # Errors
    ///
    /// Returns an error if a comment is requested without a token.
    pub fn check(&self) -> anyhow::Result<()> {
        if self.comment && self.github_token.trim().is_empty() {
            bail!("github_token is required when comment is enabled");
        }
        Ok(())
    }

    #[must_use]
    pub fn fs_config(&self) -> FsSourceConfig {
        let mut config = FsSourceConfig::default();
        config.base_dir.clone_from(&self.base_dir);
        config.files = split_list(&self.files, true);
        config.use_dot_match = self.use_dot_match;
        config
    }

    #[must_use]
    pub fn validation_config(&self) -> ValidationConfig {
        let mut config = ValidationConfig::default();
        config.extensions.json.clone_from(&self.json_extension);
        config.extensions.yaml.clone_from(&self.yaml_extension);
        config.extensions.yaml_short.clone_from(&self.yaml_extension_short);
        config.yaml_as_json = self.yaml_as_json;
        config.allow_multiple_documents = self.allow_multiple_documents;

        config.json.schema = non_empty(&self.json_schema);
        config.json.schema_version.clone_from(&self.json_schema_version);
        config.json.strict = self.ajv_strict_mode;
        config.json.use_formats = self.use_ajv_formats;
        config.json.custom_formats = split_list(&self.ajv_custom_regexp_formats, false);
        config.json.exclude_regex = non_empty(&self.json_exclude_regex);

        config.yaml.schema = non_empty(&self.yaml_schema);
        config.yaml.exclude_regex = non_empty(&self.yaml_exclude_regex);
        config
    }

    #[must_use]
    pub fn exclude_config(&self) -> ExcludeConfig {
        let mut config = ExcludeConfig::default();
        config.exclude_file = non_empty(&self.exclude_file).map(PathBuf::from);
        config.exclude_file_required = self.exclude_file_required;
        config.use_gitignore = self.use_gitignore;
        config.gitignore_path.clone_from(&self.git_ignore_path);
        config
    }
}

/// Run the action. Configuration errors are returned; validation failures are
/// mapped to the exit code according to `mode`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the `success` output
/// cannot be written.
pub async fn run() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    logging::init();
    args.check()?;
    debug!("mode: {}", args.mode);

    let fs_config = args.fs_config();
    let validation_config = args.validation_config();
    let matcher = PatternMatcher::load(&args.exclude_config())?;
    debug!("loaded {} exclude rule(s)", matcher.len());

    let json = validate_json(&fs_config, &validation_config, &matcher)?;
    let yaml = validate_yaml(&fs_config, &validation_config, &matcher)?;

    let verdict = process_results(&json, &yaml, &Mode::from(args.mode.as_str()));
    set_output("success", &verdict.success.to_string())?;

    if !verdict.success && args.comment {
        comment_on_pull_request(&args.github_token, &json, &yaml).await;
    }

    let mut summary = Vec::new();
    write_human(&json, &yaml, &mut summary)?;
    print!("{}", String::from_utf8_lossy(&summary));

    Ok(if verdict.hard_fail {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

async fn comment_on_pull_request(token: &str, json: &ValidationResult, yaml: &ValidationResult) {
    let Some(pull_request) = PullRequest::from_env() else {
        warn!("comment is enabled but this run is not for a pull request; no comment posted");
        return;
    };

    let mut body = Vec::new();
    if let Err(e) = write_comment(json, yaml, &mut body) {
        warn!("failed to render pull request comment: {e:#}");
        return;
    }

    if let Err(e) = post_comment(&pull_request, token, &String::from_utf8_lossy(&body)).await {
        warn!("failed to post pull request comment: {e:#}");
    }
}
