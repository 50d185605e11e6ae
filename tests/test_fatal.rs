
use krakend_logging::{LogFacade, LoggerBuilder, NoOpLogger};
use serde_json::json;
use std::sync::atomic::{AtomicI32, Ordering};

static EXIT_CODE: AtomicI32 = AtomicI32::new(0);

fn remember_exit_code(exit_code: i32) {
    EXIT_CODE.store(exit_code, Ordering::SeqCst);
}

#[test]
fn test_fatal_logs_critical_and_calls_hook() {
    let (_, buffer, registry) = test_utils::buffer_logger(json!({"level": "CRITICAL"}));
    let logger = LoggerBuilder::try_from_config(&test_utils::extra_config(json!({
        "level": "CRITICAL",
        "format": "custom",
        "custom_format": "%{level} %{message}",
    })))
    .unwrap()
    .add_writer(Box::new(buffer.clone()))
    .on_fatal(remember_exit_code)
    .registry(registry)
    .start()
    .unwrap_or_else(|e| panic!("Logger initialization failed with {e}"));

    logger.error(&[&"not written"]);
    assert_eq!(EXIT_CODE.load(Ordering::SeqCst), 0);

    logger.fatal(&[&"giving", &"up"]);
    assert_eq!(buffer.contents(), "CRITICAL giving up\n");
    assert_eq!(EXIT_CODE.load(Ordering::SeqCst), 1);
}

#[test]
fn test_no_op_logger_survives_fatal() {
    let logger: Box<dyn LogFacade> = Box::new(NoOpLogger);
    logger.critical(&[&"nothing"]);
    logger.fatal(&[&"still nothing"]);
}
