//! # Configuration
//!
//! - [`options`] - per-callable instrumentation options and their resolved form
//! - [`logger`] - file and console routing for the logging backend

pub mod logger;
pub mod options;

pub use logger::LoggerConfig;
pub use options::{ExceptionMap, InstrumentOptions, InstrumentationConfig, LogLabel};
