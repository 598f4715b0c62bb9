use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use tracing::{debug, info};

/// Set a step output: appended to the file named by `GITHUB_OUTPUT`, or logged
/// when that variable is not set.
///
/// # Errors
///
/// Returns an error if the output file cannot be written.
pub fn set_output(name: &str, value: &str) -> anyhow::Result<()> {
    match env::var_os("GITHUB_OUTPUT") {
        Some(path) if !path.is_empty() => append_output(Path::new(&path), name, value),
        _ => {
            info!("output {name}={value}");
            Ok(())
        }
    }
}

fn append_output(path: &Path, name: &str, value: &str) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open output file {}", path.display()))?;
    writeln!(file, "{name}={value}")
        .with_context(|| format!("failed to write output file {}", path.display()))?;
    debug!("set output {name}={value}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_outputs_are_appended() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("output");
        std::fs::write(&path, "existing=1\n").unwrap();

        append_output(&path, "success", "false").unwrap();
        append_output(&path, "other", "x").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "existing=1\nsuccess=false\nother=x\n");
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = append_output(&tmp.path().join("no/such/output"), "success", "true").unwrap_err();
        assert!(err.to_string().contains("failed to open output file"));
    }
}
