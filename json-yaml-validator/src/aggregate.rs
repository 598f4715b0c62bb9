//! Combines the JSON and YAML results into one verdict for the run.

use std::fmt;

use tracing::{error, info, warn};

use crate::report::ValidationResult;

/// What a failed run does to the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Fail the run.
    Fail,
    /// Only warn.
    Warn,
    /// Anything else: warn about it, then fail the run.
    Unrecognized(String),
}

impl From<&str> for Mode {
    fn from(value: &str) -> Self {
        match value {
            "fail" => Self::Fail,
            "warn" => Self::Warn,
            other => Self::Unrecognized(other.to_owned()),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail => f.write_str("fail"),
            Self::Warn => f.write_str("warn"),
            Self::Unrecognized(other) => f.write_str(other),
        }
    }
}

/// Outcome of [`process_results`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// Both formats passed. This is the value of the `success` output.
    pub success: bool,
    /// The process must exit with a failure status.
    pub hard_fail: bool,
}

/// Report one format's result. Returns whether that format passed.
///
/// A format with no passed and no failed files counts as passed.
#[must_use]
pub fn check_results(result: &ValidationResult, kind: &str) -> bool {
    if result.nothing_detected() {
        info!("\u{1f50e} no {kind} files were detected");
        return true;
    }

    if result.success {
        info!("\u{2705} all {} detected {kind} files are valid", result.passed);
        return true;
    }

    info!(
        "{kind} Validation Results:\n  - Passed: {}\n  - Failed: {}\n  - Violations: {}",
        result.passed,
        result.failed,
        serde_json::to_string_pretty(&result.violations).unwrap_or_default()
    );
    error!("\u{274c} {} {kind} files failed validation", result.failed);
    false
}

/// Combine both results and apply `mode` to a failed run.
#[must_use]
pub fn process_results(json: &ValidationResult, yaml: &ValidationResult, mode: &Mode) -> Verdict {
    let json_ok = check_results(json, "JSON");
    let yaml_ok = check_results(yaml, "YAML");
    if json_ok && yaml_ok {
        return Verdict {
            success: true,
            hard_fail: false,
        };
    }

    let hard_fail = match mode {
        Mode::Fail => true,
        Mode::Warn => {
            warn!("mode is set to \"warn\" - this action will not fail");
            false
        }
        Mode::Unrecognized(other) => {
            warn!("unrecognized mode: {other}");
            true
        }
    };
    error!("\u{274c} JSON or YAML files failed validation");

    Verdict {
        success: false,
        hard_fail,
    }
}
