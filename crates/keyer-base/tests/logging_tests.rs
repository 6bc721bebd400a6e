use keyer_base::logging::{default_level, init_logger, StderrLogger};
use log::{LevelFilter, Log};

#[test]
fn test_stderr_logger_respects_level() {
    let logger = StderrLogger::new(LevelFilter::Warn);

    let info = log::MetadataBuilder::new()
        .level(log::Level::Info)
        .target("test")
        .build();
    let error = log::MetadataBuilder::new()
        .level(log::Level::Error)
        .target("test")
        .build();

    assert!(!logger.enabled(&info));
    assert!(logger.enabled(&error));
}

#[test]
fn test_stderr_logger_log_does_not_panic() {
    let logger = StderrLogger::new(LevelFilter::Trace);
    let record = log::RecordBuilder::new()
        .level(log::Level::Debug)
        .target("test")
        .file(Some("test.rs"))
        .line(Some(42))
        .args(format_args!("test message"))
        .build();
    logger.log(&record);
    logger.flush();
}

#[test]
fn test_init_logger_twice_is_ignored() {
    init_logger(LevelFilter::Info);
    init_logger(LevelFilter::Trace);
    log::info!("logger initialized");
    assert!(log::max_level() <= LevelFilter::Info);
}

#[test]
fn test_default_level_matches_build_mode() {
    if cfg!(debug_assertions) {
        assert_eq!(default_level(), LevelFilter::Debug);
    } else {
        assert_eq!(default_level(), LevelFilter::Info);
    }
}
