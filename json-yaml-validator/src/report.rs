//! Validation result types.

use serde::Serialize;

use crate::error::Violation;

/// What happened to one discovered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Parsed and (when configured) matched its schema.
    Passed,
    /// Failed to read, parse, or validate.
    Failed(Violation),
    /// Skipped by an exclude rule or by ownership transfer; counted.
    Skipped,
    /// Not this pipeline's concern (schema file, other format, duplicate); not counted.
    Ignored,
}

/// Result of one pipeline run.
///
/// Invariant: `success == (failed == 0)`. Built one file at a time through
/// [`ValidationResult::record`] and returned complete at the end of the run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct ValidationResult {
    pub success: bool,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// One entry per failed file.
    pub violations: Vec<Violation>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self {
            success: true,
            passed: 0,
            failed: 0,
            skipped: 0,
            violations: Vec::new(),
        }
    }
}

impl ValidationResult {
    /// Fold one file outcome into the result.
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Passed => self.passed += 1,
            FileOutcome::Failed(violation) => {
                self.failed += 1;
                self.success = false;
                self.violations.push(violation);
            }
            FileOutcome::Skipped => self.skipped += 1,
            FileOutcome::Ignored => {}
        }
    }

    /// Whether no file was passed or failed.
    #[must_use]
    pub fn nothing_detected(&self) -> bool {
        self.passed == 0 && self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorDetail;

    #[test]
    fn test_record_keeps_success_in_sync_with_failed() {
        let mut result = ValidationResult::default();
        result.record(FileOutcome::Passed);
        result.record(FileOutcome::Skipped);
        result.record(FileOutcome::Ignored);
        assert!(result.success);
        assert_eq!((result.passed, result.failed, result.skipped), (1, 0, 1));

        result.record(FileOutcome::Failed(Violation::new(
            "bad.json",
            vec![ErrorDetail::new(None, "Invalid JSON")],
        )));
        assert!(!result.success);
        assert_eq!(result.failed, 1);
        assert_eq!(result.violations.len(), 1);
    }

    #[test]
    fn test_serialized_shape() {
        let result = ValidationResult::default();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "passed": 0,
                "failed": 0,
                "skipped": 0,
                "violations": []
            })
        );
    }
}
