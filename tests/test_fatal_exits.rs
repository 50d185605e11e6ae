
use krakend_logging::LogFacade;
use serde_json::json;

// The dispatcher restarts this test binary; the child process runs with the default fatal
// hook and must terminate with exit code 1.
#[test]
fn test_fatal_exits_process() {
    if test_utils::dispatch(1, 1).is_some() {
        let (logger, _buffer, _registry) = test_utils::buffer_logger(json!({"level": "DEBUG"}));
        logger.fatal(&[&"terminating"]);
        unreachable!("fatal returned");
    }
}
