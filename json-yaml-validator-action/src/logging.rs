use std::env;
use std::fmt;
use std::io::IsTerminal;

use chrono::Local;
use colored::Colorize;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Workflow commands (`::error::`, `::warning::`, `::debug::`) on stdout.
    Workflow,
    /// `timestamp - LEVEL - message` on stderr.
    Local { color: bool },
}

pub struct ActionFormatter {
    style: Style,
}

impl<S, N> FormatEvent<S, N> for ActionFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut message = String::new();
        ctx.format_fields(Writer::new(&mut message), event)?;
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S,%3f").to_string();
        writeln!(
            writer,
            "{}",
            render(self.style, *event.metadata().level(), &message, &timestamp)
        )
    }
}

/// Render one event as a single output entry.
fn render(style: Style, level: Level, message: &str, timestamp: &str) -> String {
    match style {
        Style::Workflow => match level {
            Level::ERROR => format!("::error::{}", escape_data(message)),
            Level::WARN => format!("::warning::{}", escape_data(message)),
            Level::INFO => message.to_owned(),
            _ => format!("::debug::{}", escape_data(message)),
        },
        Style::Local { color } => {
            let label = level.as_str();
            let label = if color {
                match level {
                    Level::ERROR => label.red().bold().to_string(),
                    Level::WARN => label.yellow().to_string(),
                    Level::INFO => label.green().to_string(),
                    _ => label.dimmed().to_string(),
                }
            } else {
                label.to_owned()
            };
            format!("{timestamp} - {label} - {message}")
        }
    }
}

/// Escape a workflow command payload so multi-line messages stay one command.
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn filter() -> EnvFilter {
    let runner_debug = env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1");
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if runner_debug { "debug" } else { "info" };
        EnvFilter::new(format!(
            "warn,json_yaml_validator={level},json_yaml_validate={level}"
        ))
    })
}

/// Install the global subscriber.
pub fn init() {
    let in_workflow = env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true");
    if in_workflow {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .event_format(ActionFormatter {
                style: Style::Workflow,
            })
            .with_writer(std::io::stdout)
            .init();
    } else {
        let color = std::io::stderr().is_terminal();
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .event_format(ActionFormatter {
                style: Style::Local { color },
            })
            .with_writer(std::io::stderr)
            .init();
    }
}
