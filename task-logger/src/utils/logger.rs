use crate::config::LoggerConfig;
use crate::error::LoggerError;
use crate::sink::{ERROR_TARGET, INFO_TARGET};
use chrono::Local;
use nu_ansi_term::{Color, Style};
use std::fmt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{
    filter::Targets,
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
    EnvFilter,
};

/// Keeps the background file writers alive; entries still buffered are
/// flushed when this is dropped.
#[derive(Debug)]
pub struct LoggerGuard {
    info_path: PathBuf,
    error_path: PathBuf,
    _guards: Vec<WorkerGuard>,
}

impl LoggerGuard {
    pub fn info_path(&self) -> &Path {
        &self.info_path
    }

    pub fn error_path(&self) -> &Path {
        &self.error_path
    }
}

/// Installs the global subscriber: one file per channel, named after today's
/// date, plus an optional coloured console.
pub fn setup_logger(config: &LoggerConfig) -> Result<LoggerGuard, LoggerError> {
    config.validate()?;

    let today = Local::now().date_naive();
    let info_path = config.info_log_path(today);
    let error_path = config.error_log_path(today);

    let (info_writer, info_guard) = open_log_file(&info_path)?;
    let (error_writer, error_guard) = open_log_file(&error_path)?;

    // Info file: info + success, and errors too when mirroring is on
    let mut info_filter = Targets::new().with_target(INFO_TARGET, tracing::Level::INFO);
    if config.errors_to_info {
        info_filter = info_filter.with_target(ERROR_TARGET, tracing::Level::ERROR);
    }

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_writer)
        .with_ansi(false)
        .event_format(FileFormatter)
        .with_filter(info_filter);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_writer)
        .with_ansi(false)
        .event_format(FileFormatter)
        .with_filter(Targets::new().with_target(ERROR_TARGET, tracing::Level::ERROR));

    let console_layer = if config.console {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&config.console_filter).map_err(|e| {
                LoggerError::InvalidFilter {
                    filter: config.console_filter.clone(),
                    reason: e.to_string(),
                }
            })?,
        };

        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(true)
                .event_format(TerminalFormatter)
                .with_filter(filter),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(info_layer)
        .with(error_layer)
        .with(console_layer)
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    Ok(LoggerGuard {
        info_path,
        error_path,
        _guards: vec![info_guard, error_guard],
    })
}

fn open_log_file(path: &Path) -> Result<(NonBlocking, WorkerGuard), LoggerError> {
    let io_error = |e: std::io::Error| LoggerError::Io {
        path: path.display().to_string(),
        msg: e.to_string(),
    };

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(io_error)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_error)?;

    Ok(tracing_appender::non_blocking(file))
}

// --- Formatters ---

#[derive(Default)]
struct EntryVisitor {
    message: String,
    task: Option<String>,
    status: Option<String>,
}

impl tracing::field::Visit for EntryVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{:?}", value),
            "task" => self.task = Some(format!("{:?}", value)),
            "status" => self.status = Some(format!("{:?}", value)),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "task" => self.task = Some(value.to_string()),
            "status" => self.status = Some(value.to_string()),
            _ => {}
        }
    }
}

impl EntryVisitor {
    fn from_event(event: &Event<'_>) -> Self {
        let mut visitor = Self::default();
        event.record(&mut visitor);
        visitor
    }
}

pub struct TerminalFormatter;

impl<S, N> FormatEvent<S, N> for TerminalFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let entry = EntryVisitor::from_event(event);
        let status = entry
            .status
            .unwrap_or_else(|| event.metadata().level().to_string());
        let colored_msg = colorize(&status, &entry.message);

        if let Some(task) = entry.task {
            let dim = Style::new().dimmed();
            write!(writer, "{} ", dim.paint(format!("[{}]", task)))?;
        }
        write!(writer, "{}", colored_msg)?;
        writeln!(writer)
    }
}

fn status_style(status: &str) -> Option<Style> {
    match status {
        "SUCCESS" => Some(Style::new().fg(Color::LightGreen).bold()),
        "ERROR" => Some(Style::new().fg(Color::LightRed).bold()),
        _ => None,
    }
}

// Colour follows the entry's status, never the words inside the message.
fn colorize(status: &str, msg: &str) -> String {
    match status_style(status) {
        Some(style) => style.paint(msg).to_string(),
        None => msg.to_string(),
    }
}

pub struct FileFormatter;

impl<S, N> FormatEvent<S, N> for FileFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let entry = EntryVisitor::from_event(event);
        let status = entry
            .status
            .unwrap_or_else(|| event.metadata().level().to_string());

        write!(writer, "{} [{}] ", timestamp, status)?;
        if let Some(task) = entry.task {
            write!(writer, "{} | ", task)?;
        }
        writeln!(writer, "{}", entry.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colour_comes_from_status_not_message() {
        let red = Style::new().fg(Color::LightRed).bold();
        let green = Style::new().fg(Color::LightGreen).bold();

        let error_mentioning_success = "job.run: ERROR : SUCCESS was expected";
        assert_eq!(
            colorize("ERROR", error_mentioning_success),
            red.paint(error_mentioning_success).to_string()
        );

        let success = "job.run: SUCCESS : done";
        assert_eq!(colorize("SUCCESS", success), green.paint(success).to_string());
    }

    #[test]
    fn test_info_mentioning_error_stays_plain() {
        let msg = "job.run: INFO : retrying after ERROR";
        assert_eq!(colorize("INFO", msg), msg);
        assert_eq!(colorize("WARN", msg), msg);
    }
}
