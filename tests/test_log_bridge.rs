
use krakend_logging::LoggingError;
use log::*;
use serde_json::json;

#[test]
fn test_log_macros_reach_the_backends() {
    let (logger, buffer, _registry) = test_utils::buffer_logger(json!({
        "level": "WARNING",
        "format": "custom",
        "custom_format": "%{level} %{message}",
    }));
    logger
        .install_as_log_logger()
        .unwrap_or_else(|e| panic!("Registering with log failed with {e}"));

    error!("disk {} is full", "/var");
    warn!("This is a warning");
    info!("This is an info message - you must not see it!");
    debug!("This is a debug message - you must not see it!");
    trace!("This is a trace message - you must not see it!");
    log::logger().flush();

    assert_eq!(
        buffer.lines(),
        vec!["ERROR disk /var is full", "WARNING This is a warning"]
    );
    assert!(log_enabled!(Level::Error));
    assert!(!log_enabled!(Level::Info));

    // the log crate accepts only one logger per process
    assert!(matches!(
        logger.install_as_log_logger(),
        Err(LoggingError::Log(_))
    ));
}
