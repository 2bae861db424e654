use std::sync::Arc;
use task_logger::{
    instrument, setup_logger, Classify, InstrumentOptions, LoggerConfig, TracingSink,
};
use thiserror::Error;

#[derive(Error, Debug)]
enum UploadError {
    #[error("quota exceeded")]
    QuotaExceeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum UploadErrorKind {
    QuotaExceeded,
}

impl Classify for UploadError {
    type Kind = UploadErrorKind;

    fn kind(&self) -> UploadErrorKind {
        UploadErrorKind::QuotaExceeded
    }
}

fn upload(size: u64) -> Result<u64, UploadError> {
    if size > 100 {
        Err(UploadError::QuotaExceeded)
    } else {
        Ok(size)
    }
}

// Runs in its own process so it can install a subscriber with mirroring off.
#[test]
fn test_errors_stay_out_of_info_file_without_mirroring() {
    let dir = tempfile::tempdir().unwrap();
    let config = LoggerConfig {
        log_dir: dir.path().to_string_lossy().into_owned(),
        errors_to_info: false,
        console: false,
        ..Default::default()
    };

    let guard = setup_logger(&config).unwrap();
    let info_path = guard.info_path().to_path_buf();
    let error_path = guard.error_path().to_path_buf();

    let options = InstrumentOptions::new()
        .with_info_message("uploading")
        .with_success_message("uploaded")
        .with_label_prefix("storage")
        .on_error(UploadErrorKind::QuotaExceeded, "upload over quota");
    let sink = Arc::new(TracingSink::from_config(&config));
    let upload = instrument(options, sink.clone(), upload);

    upload.call((10,)).unwrap();
    assert!(upload.call((500,)).unwrap_err().is_mapped());
    sink.status_code_error(413);

    drop(guard);

    let info_log = std::fs::read_to_string(&info_path).unwrap();
    let error_log = std::fs::read_to_string(&error_path).unwrap();

    assert!(info_log.contains("storage.upload: INFO : uploading"));
    assert!(info_log.contains("storage.upload: SUCCESS : uploaded"));
    assert!(!info_log.contains("ERROR"));
    assert!(!info_log.contains("upload over quota"));
    assert!(!info_log.contains("Status code: [413]"));

    assert!(error_log.contains("[ERROR] GError | storage.upload: ERROR : upload over quota"));
    assert!(error_log.contains("Status code: [413]"));
    assert!(!error_log.contains("uploading"));
}
