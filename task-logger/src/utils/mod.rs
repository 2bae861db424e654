//! # Utilities Module
//!
//! Internal utility modules for the task-logger crate.
//! These modules are marked as `pub(crate)` to enforce API boundaries.

pub(crate) mod logger;
pub(crate) mod name;

pub use logger::{setup_logger, LoggerGuard};
