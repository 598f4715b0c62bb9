// These Clippy lints are disabled because this is an action binary, not a library:
// - print_stdout: the run summary is printed to the workflow log.
#![allow(clippy::print_stdout)]

mod cli;
mod comment;
mod logging;
mod outputs;

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
