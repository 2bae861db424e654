//! # Error Types
//!
//! Errors surfaced by instrumented calls and by logger setup.
//! All errors implement `std::error::Error` and `std::fmt::Display`.

use thiserror::Error;

/// Outcome of a failed instrumented call.
///
/// Errors whose kind is present in the classification table come back
/// untouched as [`Failure::Mapped`]. Every other error is collapsed into the
/// single [`UnknownError`] kind, keeping only its diagnostic trace.
#[derive(Error, Debug)]
pub enum Failure<E> {
    #[error(transparent)]
    Mapped(E),

    #[error(transparent)]
    Unknown(UnknownError),
}

impl<E> Failure<E> {
    pub fn is_mapped(&self) -> bool {
        matches!(self, Failure::Mapped(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Failure::Unknown(_))
    }

    pub fn mapped(&self) -> Option<&E> {
        match self {
            Failure::Mapped(e) => Some(e),
            Failure::Unknown(_) => None,
        }
    }

    pub fn unknown(&self) -> Option<&UnknownError> {
        match self {
            Failure::Mapped(_) => None,
            Failure::Unknown(e) => Some(e),
        }
    }

    /// Returns the original error, or the canonical unknown error if the
    /// original kind was not classified.
    pub fn into_mapped(self) -> Result<E, UnknownError> {
        match self {
            Failure::Mapped(e) => Ok(e),
            Failure::Unknown(e) => Err(e),
        }
    }
}

/// Canonical error for failures missing from the classification table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown error in {label}: {trace}")]
pub struct UnknownError {
    /// Label of the instrumented callable that failed.
    pub label: String,
    /// `Debug` rendering of the original error kind.
    pub kind: String,
    /// Error message, its `Caused by:` chain and, when enabled, a backtrace.
    pub trace: String,
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from '{path}': {source}")]
    Load {
        path: String,
        #[source]
        source: ::config::ConfigError,
    },

    #[error("Failed to parse instrumentation options: {source}")]
    Parse {
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Logger setup errors
#[derive(Error, Debug)]
pub enum LoggerError {
    #[error(transparent)]
    Config(ConfigError),

    #[error("I/O error preparing {path}: {msg}")]
    Io { path: String, msg: String },

    #[error("Invalid console filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("A global tracing subscriber is already installed")]
    AlreadyInitialized,
}

impl From<ConfigError> for LoggerError {
    fn from(e: ConfigError) -> Self {
        LoggerError::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Error, Debug, PartialEq)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn test_failure_accessors() {
        let mapped: Failure<Boom> = Failure::Mapped(Boom);
        assert!(mapped.is_mapped());
        assert_eq!(mapped.mapped(), Some(&Boom));
        assert_eq!(mapped.to_string(), "boom");

        let unknown: Failure<Boom> = Failure::Unknown(UnknownError {
            label: "mod.op".to_string(),
            kind: "Boom".to_string(),
            trace: "boom".to_string(),
        });
        assert!(unknown.is_unknown());
        assert!(unknown.mapped().is_none());
        assert_eq!(unknown.to_string(), "Unknown error in mod.op: boom");
        assert_eq!(unknown.into_mapped().unwrap_err().kind, "Boom");
    }
}
