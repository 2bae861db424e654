use crate::error::ConfigError;
use ::config::{Config, Environment, File};
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Environment prefix for overrides, e.g. `TASK_LOG_LOG_DIR=/var/log/app`.
pub const ENV_PREFIX: &str = "TASK_LOG";

const DEFAULT_DATE_FORMAT: &str = "%d%m%Y";

/// Routing of the info and error channels to dated log files.
///
/// The info file receives info and success entries, the error file receives
/// error entries; with `errors_to_info` set, errors are mirrored into the
/// info file as well.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub log_dir: String,
    pub info_task: String,
    pub error_task: String,
    pub errors_to_info: bool,
    pub date_format: String,
    pub console: bool,
    /// `EnvFilter` directives for the console; `RUST_LOG` takes precedence.
    pub console_filter: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            info_task: "GInfo".to_string(),
            error_task: "GError".to_string(),
            errors_to_info: true,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            console: true,
            console_filter: "task_info=info,task_error=error,warn".to_string(),
        }
    }
}

impl LoggerConfig {
    /// Loads a TOML file, then applies `TASK_LOG_*` environment overrides.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        Self::load_with_env_prefix(path, ENV_PREFIX)
    }

    pub fn load_with_env_prefix(path: &str, env_prefix: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix(env_prefix))
            .build()
            .map_err(|source| ConfigError::Load {
                path: path.to_string(),
                source,
            })?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|source| ConfigError::Load {
                path: path.to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_dir.trim().is_empty() {
            return Err(invalid("log_dir", "must not be empty"));
        }
        if self.info_task.trim().is_empty() {
            return Err(invalid("info_task", "must not be empty"));
        }
        if self.error_task.trim().is_empty() {
            return Err(invalid("error_task", "must not be empty"));
        }
        if self.info_task == self.error_task {
            return Err(invalid(
                "error_task",
                "must differ from info_task so the channels stay separate",
            ));
        }
        if self.date_format.is_empty()
            || StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error))
        {
            return Err(invalid(
                "date_format",
                &format!("'{}' is not a valid strftime format", self.date_format),
            ));
        }
        Ok(())
    }

    /// `{log_dir}/info/logs_{date}.log`
    pub fn info_log_path(&self, date: NaiveDate) -> PathBuf {
        Path::new(&self.log_dir)
            .join("info")
            .join(format!("logs_{}.log", self.stamp(date)))
    }

    /// `{log_dir}/errors/errors_{date}.log`
    pub fn error_log_path(&self, date: NaiveDate) -> PathBuf {
        Path::new(&self.log_dir)
            .join("errors")
            .join(format!("errors_{}.log", self.stamp(date)))
    }

    fn stamp(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.date_format)).is_err() {
            out.clear();
            let _ = write!(out, "{}", date.format(DEFAULT_DATE_FORMAT));
        }
        out
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    #[test]
    fn test_default_paths_follow_day_month_year() {
        let config = LoggerConfig::default();
        assert_eq!(
            config.info_log_path(date()),
            Path::new("logs").join("info").join("logs_07032024.log")
        );
        assert_eq!(
            config.error_log_path(date()),
            Path::new("logs").join("errors").join("errors_07032024.log")
        );
    }

    #[test]
    fn test_custom_date_format() {
        let config = LoggerConfig {
            log_dir: "out".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.info_log_path(date()),
            Path::new("out").join("info").join("logs_2024-03-07.log")
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(LoggerConfig::default().validate().is_ok());

        let same_tasks = LoggerConfig {
            error_task: "GInfo".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            same_tasks.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "error_task"
        ));

        let bad_format = LoggerConfig {
            date_format: "%Q%".to_string(),
            ..Default::default()
        };
        assert!(bad_format.validate().is_err());

        let empty_dir = LoggerConfig {
            log_dir: " ".to_string(),
            ..Default::default()
        };
        assert!(empty_dir.validate().is_err());
    }
}
