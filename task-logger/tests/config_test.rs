use serde::Deserialize;
use std::io::Write;
use task_logger::{ConfigError, InstrumentOptions, LoggerConfig};
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_logger_config_file_overrides_defaults() {
    let file = write_config(
        r#"
        log_dir = "var/logs"
        info_task = "Infos"
        errors_to_info = false
        "#,
    );

    let config = LoggerConfig::load_with_env_prefix(
        file.path().to_str().unwrap(),
        "TASK_LOG_TEST_FILE_ONLY",
    )
    .unwrap();

    assert_eq!(config.log_dir, "var/logs");
    assert_eq!(config.info_task, "Infos");
    assert_eq!(config.error_task, "GError");
    assert!(!config.errors_to_info);
    assert_eq!(config.date_format, "%d%m%Y");
}

#[test]
fn test_logger_config_env_overrides_file() {
    let file = write_config("log_dir = \"from-file\"\n");
    std::env::set_var("TASK_LOG_TEST_ENV_LOG_DIR", "from-env");

    let config =
        LoggerConfig::load_with_env_prefix(file.path().to_str().unwrap(), "TASK_LOG_TEST_ENV")
            .unwrap();

    std::env::remove_var("TASK_LOG_TEST_ENV_LOG_DIR");
    assert_eq!(config.log_dir, "from-env");
}

#[test]
fn test_logger_config_rejects_invalid_values() {
    let file = write_config(
        r#"
        info_task = "Same"
        error_task = "Same"
        "#,
    );

    let err = LoggerConfig::load_with_env_prefix(
        file.path().to_str().unwrap(),
        "TASK_LOG_TEST_INVALID",
    )
    .unwrap_err();

    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
fn test_logger_config_missing_file() {
    let err = LoggerConfig::load("definitely/not/here.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Load { .. }));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
enum HttpErrorKind {
    Timeout,
    NotFound,
    Unauthorized,
}

#[test]
fn test_instrument_options_from_toml_document() {
    let options = InstrumentOptions::<HttpErrorKind>::from_toml_str(
        r#"
        info_message = "Fetching profile"
        success_message = "Profile fetched"
        label_prefix = "api.profile"
        label_suffix = "get"

        [exceptions]
        Timeout = "Upstream timed out"
        NotFound = "Profile does not exist"
        "#,
    )
    .unwrap();

    let config = options.resolve("ignored");
    assert_eq!(config.label().as_str(), "api.profile.get");
    assert_eq!(config.info_message(), "Fetching profile");
    assert!(!config.is_timed());
    assert_eq!(config.exceptions().len(), 2);
    assert_eq!(
        config.exceptions().get(&HttpErrorKind::NotFound),
        Some("Profile does not exist")
    );
    assert_eq!(config.exceptions().get(&HttpErrorKind::Unauthorized), None);
}
