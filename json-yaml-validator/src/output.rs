//! Shared output formatting for validation results.
//!
//! Provides the pull request comment body and a plain-text run summary.
//! Color/terminal formatting is excluded from this core module; that concern
//! belongs to the action layer.

use std::io::Write;

use crate::report::ValidationResult;

/// Write the pull request comment for a failed run.
///
/// Each format with failures gets a collapsible section holding its
/// violations as a fenced JSON block.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_comment(
    json: &ValidationResult,
    yaml: &ValidationResult,
    writer: &mut dyn Write,
) -> anyhow::Result<()> {
    writeln!(writer, "### \u{274c} JSON and YAML validation failed")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "| Format | Passed | Failed | Skipped |\n| --- | --- | --- | --- |"
    )?;
    for (kind, result) in [("JSON", json), ("YAML", yaml)] {
        writeln!(
            writer,
            "| {kind} | {} | {} | {} |",
            result.passed, result.failed, result.skipped
        )?;
    }

    for (kind, result) in [("JSON", json), ("YAML", yaml)] {
        if result.success {
            continue;
        }
        let violations = serde_json::to_string_pretty(&result.violations)?;
        writeln!(writer)?;
        writeln!(writer, "<details><summary>{kind} Validation Errors</summary>")?;
        writeln!(writer)?;
        writeln!(writer, "```json\n{violations}\n```")?;
        writeln!(writer)?;
        writeln!(writer, "</details>")?;
    }

    Ok(())
}

/// Format both results as human-readable plain text to a writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(
    json: &ValidationResult,
    yaml: &ValidationResult,
    writer: &mut dyn Write,
) -> anyhow::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer, "  JSON AND YAML VALIDATOR")?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer)?;
    for (kind, result) in [("JSON", json), ("YAML", yaml)] {
        writeln!(
            writer,
            "  {kind}  passed: {:<6} failed: {:<6} skipped: {}",
            result.passed, result.failed, result.skipped
        )?;
    }
    writeln!(writer)?;

    let failed = json.failed + yaml.failed;
    if failed > 0 {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  VIOLATIONS")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for violation in json.violations.iter().chain(&yaml.violations) {
            writeln!(writer, "{}", violation.format_human_readable())?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "{}", "=".repeat(80))?;
    if failed == 0 {
        writeln!(
            writer,
            "\u{2713} All {} files passed validation",
            json.passed + yaml.passed
        )?;
    } else {
        writeln!(writer, "\u{2717} {failed} file(s) failed validation")?;
    }
    writeln!(writer, "{}", "=".repeat(80))?;

    Ok(())
}
