//! # Sinks
//!
//! Ready-made [`LogSink`] implementations: a recorder that keeps entries in
//! memory and a bridge that forwards entries into `tracing` on the info and
//! error channels picked up by [`setup_logger`](crate::setup_logger).

use crate::config::LoggerConfig;
use crate::traits::{Level, LogSink};
use std::sync::{Mutex, PoisonError};

/// `tracing` target carrying info and success entries.
pub const INFO_TARGET: &str = "task_info";
/// `tracing` target carrying error entries.
pub const ERROR_TARGET: &str = "task_error";

/// One recorded log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Level,
    pub label: String,
    pub message: String,
}

/// Keeps every emitted entry in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    pub fn levels(&self) -> Vec<Level> {
        self.lock().iter().map(|entry| entry.level).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for MemorySink {
    fn emit(&self, level: Level, label: &str, message: &str) {
        self.lock().push(LogEntry {
            level,
            label: label.to_string(),
            message: message.to_string(),
        });
    }
}

/// Forwards entries to `tracing`, tagged with the task bound to each channel.
#[derive(Debug, Clone)]
pub struct TracingSink {
    info_task: String,
    error_task: String,
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::from_config(&LoggerConfig::default())
    }
}

impl TracingSink {
    pub fn new(info_task: impl Into<String>, error_task: impl Into<String>) -> Self {
        Self {
            info_task: info_task.into(),
            error_task: error_task.into(),
        }
    }

    pub fn from_config(config: &LoggerConfig) -> Self {
        Self::new(config.info_task.clone(), config.error_task.clone())
    }

    pub fn info_task(&self) -> &str {
        &self.info_task
    }

    pub fn error_task(&self) -> &str {
        &self.error_task
    }

    /// Logs `Status code: [{code}]` as a success on the info channel.
    pub fn status_code_success(&self, status_code: u16) {
        tracing::info!(
            target: INFO_TARGET,
            task = %self.info_task,
            status = Level::Success.as_str(),
            "Status code: [{}]",
            status_code
        );
    }

    /// Logs `Status code: [{code}]` as an error on the error channel.
    pub fn status_code_error(&self, status_code: u16) {
        tracing::error!(
            target: ERROR_TARGET,
            task = %self.error_task,
            status = Level::Error.as_str(),
            "Status code: [{}]",
            status_code
        );
    }
}

impl LogSink for TracingSink {
    fn emit(&self, level: Level, label: &str, message: &str) {
        let status = level.as_str();
        match level {
            Level::Info | Level::Success => tracing::info!(
                target: INFO_TARGET,
                task = %self.info_task,
                status,
                "{}: {} : {}",
                label,
                status,
                message
            ),
            Level::Error => tracing::error!(
                target: ERROR_TARGET,
                task = %self.error_task,
                status,
                "{}: {} : {}",
                label,
                status,
                message
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemorySink::new();
        sink.emit(Level::Info, "mod.op", "start");
        sink.emit(Level::Success, "mod.op", "done");

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.levels(), vec![Level::Info, Level::Success]);
        assert_eq!(sink.entries()[1].message, "done");

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_tracing_sink_binds_tasks_from_config() {
        let config = LoggerConfig {
            info_task: "Infos".to_string(),
            error_task: "Errors".to_string(),
            ..Default::default()
        };
        let sink = TracingSink::from_config(&config);
        assert_eq!(sink.info_task(), "Infos");
        assert_eq!(sink.error_task(), "Errors");

        // No subscriber installed: emitting is a no-op.
        sink.emit(Level::Error, "mod.op", "failed");
    }
}
