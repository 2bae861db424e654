//! # Task Logger - Lifecycle Logging for Callables
//!
//! Wraps functions and closures so that every call logs an info entry before
//! running, a success entry after returning, and a classified error entry
//! when it fails.
//!
//! ## Modules
//!
//! - [`config`] - Instrumentation options and logger routing configuration
//! - [`error`] - Typed error handling with thiserror
//! - [`instrument`] - The instrumentation wrapper
//! - [`sink`] - Log sinks (in-memory recorder, `tracing` bridge)
//! - [`traits`] - Core trait definitions
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use task_logger::{instrument, Classify, InstrumentOptions, MemorySink};
//!
//! #[derive(Debug, thiserror::Error)]
//! enum MathError {
//!     #[error("division by zero")]
//!     DivisionByZero,
//! }
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum MathErrorKind {
//!     DivisionByZero,
//! }
//!
//! impl Classify for MathError {
//!     type Kind = MathErrorKind;
//!     fn kind(&self) -> MathErrorKind {
//!         MathErrorKind::DivisionByZero
//!     }
//! }
//!
//! fn divide(a: i64, b: i64) -> Result<i64, MathError> {
//!     a.checked_div(b).ok_or(MathError::DivisionByZero)
//! }
//!
//! let sink = Arc::new(MemorySink::new());
//! let options = InstrumentOptions::new()
//!     .with_info_message("Executing some code")
//!     .with_success_message("Successfully executed")
//!     .with_label_prefix("mod")
//!     .on_error(MathErrorKind::DivisionByZero, "You can't divide by 0");
//!
//! let divide = instrument(options, sink.clone(), divide);
//! assert_eq!(divide.label().as_str(), "mod.divide");
//! assert_eq!(divide.call((10, 2)).unwrap(), 5);
//! assert!(divide.call((10, 0)).unwrap_err().is_mapped());
//! assert_eq!(sink.len(), 4);
//! ```

pub mod config;
pub mod error;
pub mod instrument;
pub mod sink;
pub mod traits;
pub(crate) mod utils;

// Selective exports - only public API types
pub use crate::config::{
    ExceptionMap, InstrumentOptions, InstrumentationConfig, LogLabel, LoggerConfig,
};
pub use error::{ConfigError, Failure, LoggerError, UnknownError};
pub use instrument::{
    instrument, instrument_timed, Instrument, Instrumented, TIMER_LABEL, UNKNOWN_ERROR_MESSAGE,
};
pub use sink::{LogEntry, MemorySink, TracingSink, ERROR_TARGET, INFO_TARGET};
pub use traits::{Classify, Level, LogSink, Target};

pub use utils::{setup_logger, LoggerGuard};
