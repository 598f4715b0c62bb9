//! Format-specific validation pipelines.
//!
//! Each sub-module drives one format from file discovery to a
//! [`ValidationResult`](crate::report::ValidationResult):
//! - `json`: JSON files, plus YAML files when they are treated as JSON
//! - `yaml`: YAML files, single documents or `---` streams

pub mod json;
pub mod yaml;

use regex::Regex;
use tracing::info;

use crate::error::ConfigError;
use crate::exclude::Exclusion;

/// The two exclusion checks both pipelines run: the per-format regex, then
/// the shared exclude rules.
pub struct ExcludeGate<'a> {
    regex: Option<Regex>,
    exclusion: &'a dyn Exclusion,
}

impl<'a> ExcludeGate<'a> {
    pub fn new(pattern: Option<&str>, exclusion: &'a dyn Exclusion) -> Result<Self, ConfigError> {
        let regex = pattern
            .filter(|p| !p.is_empty())
            .map(|p| {
                Regex::new(p).map_err(|source| ConfigError::InvalidExcludeRegex {
                    pattern: p.to_owned(),
                    source,
                })
            })
            .transpose()?;
        Ok(Self { regex, exclusion })
    }

    /// Whether `path` is skipped. Logs the skip.
    pub fn excludes(&self, path: &str) -> bool {
        let excluded = self.regex.as_ref().is_some_and(|r| r.is_match(path))
            || self.exclusion.is_excluded(path);
        if excluded {
            info!("skipping due to exclude match: {path}");
        }
        excluded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_and_exclusion_both_skip() {
        let by_name = |path: &str| path.ends_with("vendor.json");
        let gate = ExcludeGate::new(Some(r"^fixtures/"), &by_name).unwrap();
        assert!(gate.excludes("fixtures/a.json"));
        assert!(gate.excludes("src/vendor.json"));
        assert!(!gate.excludes("src/app.json"));
    }

    #[test]
    fn test_empty_regex_is_unset() {
        let never = |_: &str| false;
        let gate = ExcludeGate::new(Some(""), &never).unwrap();
        assert!(!gate.excludes("anything.json"));
    }

    #[test]
    fn test_invalid_regex_is_config_error() {
        let never = |_: &str| false;
        let err = ExcludeGate::new(Some("(unclosed"), &never).err().unwrap();
        assert!(matches!(err, ConfigError::InvalidExcludeRegex { .. }));
    }
}
