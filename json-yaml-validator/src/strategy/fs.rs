//! Filesystem validation source.
//!
//! Resolves the candidate file list and reads files safely for the pipelines.
//! Properties enforced here:
//! - Symlinks are not followed by default (`follow_links: false`)
//! - Only regular files are returned by a crawl
//! - Maximum directory depth is enforced
//! - Bounded streaming reads prevent memory `DoS`

use std::fmt;
use std::io::Read;
use std::path::Path;

use glob::{MatchOptions, Pattern};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::{Extensions, FsSourceConfig};
use crate::error::ConfigError;
use crate::strategy::normalize_path;

/// A per-file read failure. Reported as a violation, never fatal.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Failed to open file: {0}")]
    Open(#[source] std::io::Error),
    #[error("Failed to read file: {0}")]
    Read(#[source] std::io::Error),
    #[error("File exceeds maximum size of {0} bytes")]
    TooLarge(u64),
    #[error("File is not valid UTF-8")]
    InvalidEncoding,
}

/// The crawl selector for one pipeline: one `**/*.<ext>` pattern per extension.
#[derive(Debug, Clone)]
pub struct FileGlob {
    patterns: Vec<Pattern>,
    display: String,
}

impl FileGlob {
    /// `**/*<json>`, or `**/*{<json>,<yaml>,<yml>}` when YAML is treated as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGlob`] if an extension produces an invalid pattern.
    pub fn for_json(extensions: &Extensions, yaml_as_json: bool) -> Result<Self, ConfigError> {
        if yaml_as_json {
            let yaml = bare(&extensions.yaml);
            let yaml_short = bare(&extensions.yaml_short);
            Self::build(
                &[&extensions.json, &extensions.yaml, &extensions.yaml_short],
                format!("**/*{{{},{yaml},{yaml_short}}}", extensions.json),
            )
        } else {
            Self::build(&[&extensions.json], format!("**/*{}", extensions.json))
        }
    }

    /// `**/*.{<yaml>,<yml>}`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGlob`] if an extension produces an invalid pattern.
    pub fn for_yaml(extensions: &Extensions) -> Result<Self, ConfigError> {
        let yaml = bare(&extensions.yaml);
        let yaml_short = bare(&extensions.yaml_short);
        Self::build(
            &[&extensions.yaml, &extensions.yaml_short],
            format!("**/*.{{{yaml},{yaml_short}}}"),
        )
    }

    fn build(extensions: &[&str], display: String) -> Result<Self, ConfigError> {
        let patterns = extensions
            .iter()
            .filter(|ext| !ext.is_empty())
            .map(|ext| {
                let pattern = format!("**/*.{}", bare(ext));
                Pattern::new(&pattern).map_err(|e| ConfigError::InvalidGlob {
                    pattern,
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns, display })
    }

    fn matches(&self, relative: &Path, options: MatchOptions) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_path_with(relative, options))
    }
}

impl fmt::Display for FileGlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

fn bare(ext: &str) -> &str {
    ext.strip_prefix('.').unwrap_or(ext)
}

fn match_options(use_dot_match: bool) -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: !use_dot_match,
    }
}

/// Produce the candidate file list for one pipeline.
///
/// An explicit `files` list wins over crawling `base_dir`. Entries of the list
/// are expanded independently and concatenated; duplicates are left for the
/// pipeline's duplicate gate. Every returned path is normalized.
///
/// # Errors
///
/// Returns an error if a pattern is not a valid glob, or if `base_dir` does not
/// exist when it has to be crawled.
pub fn resolve_files(config: &FsSourceConfig, glob: &FileGlob) -> Result<Vec<String>, ConfigError> {
    if config.files.is_empty() {
        crawl(config, glob)
    } else {
        expand_file_list(&config.files, config.use_dot_match)
    }
}

fn expand_file_list(patterns: &[String], use_dot_match: bool) -> Result<Vec<String>, ConfigError> {
    let mut files = Vec::new();
    for pattern in patterns {
        let entries = glob::glob_with(pattern, match_options(use_dot_match)).map_err(|e| {
            ConfigError::InvalidGlob {
                pattern: pattern.clone(),
                message: e.to_string(),
            }
        })?;
        let before = files.len();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => files.push(normalize_path(&path.to_string_lossy())),
                Ok(_) => {}
                Err(e) => warn!("unable to read glob match for '{pattern}': {e}"),
            }
        }
        if files.len() == before {
            debug!("no files matched pattern: {pattern}");
        }
    }
    debug!("using files: {}", files.join(", "));
    Ok(files)
}

fn crawl(config: &FsSourceConfig, glob: &FileGlob) -> Result<Vec<String>, ConfigError> {
    let base_dir = &config.base_dir;
    if !base_dir.is_dir() {
        return Err(ConfigError::BaseDirNotFound {
            path: base_dir.clone(),
        });
    }
    debug!("using baseDir: {}", base_dir.display());
    debug!("using glob: {glob}");

    let options = match_options(config.use_dot_match);
    let use_dot_match = config.use_dot_match;
    let mut files = Vec::new();

    for entry_result in WalkDir::new(base_dir)
        .follow_links(config.follow_links)
        .max_depth(config.max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| use_dot_match || e.depth() == 0 || !is_hidden(e))
    {
        let entry = match entry_result {
            Ok(e) => e,
            Err(walk_err) => {
                warn!("directory traversal error: {walk_err}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(base_dir)
            .unwrap_or_else(|_| entry.path());
        if glob.matches(relative, options) {
            files.push(normalize_path(&entry.path().to_string_lossy()));
        }
    }

    Ok(files)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Read a file using a bounded streaming read, enforcing `max_file_size`.
///
/// Reads at most `max_file_size + 1` bytes so the size check and the read are
/// the same operation.
///
/// # Errors
///
/// Returns a [`ReadError`] if the file cannot be opened or read, exceeds
/// `max_file_size`, or is not valid UTF-8.
pub fn read_file_bounded(path: &Path, max_file_size: u64) -> Result<String, ReadError> {
    let file = std::fs::File::open(path).map_err(ReadError::Open)?;

    let mut buffer = Vec::new();
    file.take(max_file_size.saturating_add(1))
        .read_to_end(&mut buffer)
        .map_err(ReadError::Read)?;

    if buffer.len() as u64 > max_file_size {
        return Err(ReadError::TooLarge(max_file_size));
    }

    String::from_utf8(buffer).map_err(|_| ReadError::InvalidEncoding)
}
