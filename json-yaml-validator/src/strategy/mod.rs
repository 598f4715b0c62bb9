//! Validation source strategies.
//!
//! Only the filesystem strategy (`fs`) exists. Both pipelines share the path
//! representation and the ownership rule defined here, so the JSON and YAML
//! sides never disagree about who validates a file.

pub mod fs;

use crate::config::Extensions;

/// Which pipeline validates a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOwner {
    /// A JSON file.
    Json,
    /// A YAML file, validated by the YAML pipeline.
    Yaml,
    /// A YAML file while YAML-as-JSON is on: the JSON pipeline validates it and
    /// the YAML pipeline counts it as skipped.
    Both,
}

/// Classify a path by extension. `None` means neither pipeline handles it.
#[must_use]
pub fn classify(path: &str, extensions: &Extensions, yaml_as_json: bool) -> Option<FileOwner> {
    let has_ext = |ext: &str| !ext.is_empty() && path.ends_with(ext);

    if has_ext(&extensions.yaml) || has_ext(&extensions.yaml_short) {
        Some(if yaml_as_json {
            FileOwner::Both
        } else {
            FileOwner::Yaml
        })
    } else if has_ext(&extensions.json) {
        Some(FileOwner::Json)
    } else {
        None
    }
}

/// Normalize a path string: forward slashes, no leading `./`.
///
/// Every path is normalized before exclusion, self-skip and duplicate checks,
/// whichever way it was discovered.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let mut normalized = path.replace('\\', "/");
    while let Some(rest) = normalized.strip_prefix("./") {
        normalized = rest.to_owned();
    }
    normalized
}
