
#[cfg(not(feature = "syslog_writer"))]
#[test]
fn test_syslog_needs_the_feature() {
    use krakend_logging::{LoggerBuilder, LoggingError};

    let (_logger, _buffer, registry) = test_utils::buffer_logger(serde_json::json!({
        "level": "INFO",
    }));
    let result = LoggerBuilder::try_from_config(&test_utils::extra_config(serde_json::json!({
        "level": "INFO",
        "syslog": true,
    })))
    .unwrap()
    .registry(registry.clone())
    .start();
    match result {
        Err(LoggingError::Syslog(e)) => assert_eq!(e.kind(), std::io::ErrorKind::Unsupported),
        Err(e) => panic!("unexpected error {e}"),
        Ok(_) => panic!("syslog output must fail without the syslog_writer feature"),
    }
    assert_eq!(registry.active_backends().unwrap(), 1);
}

#[cfg(feature = "syslog_writer")]
mod test {
    use super::test_utils;
    use krakend_logging::{
        writers::{SyslogConnection, SyslogFacility},
        BackendRegistry, LogFacade, LoggerBuilder, LoggingError, Severity,
    };
    use serde_json::json;
    use std::{net::UdpSocket, time::Duration};

    fn receive(server: &UdpSocket) -> String {
        let mut buf = [0_u8; 2048];
        let n = server.recv(&mut buf).unwrap();
        String::from_utf8_lossy(&buf[..n]).into_owned()
    }

    fn udp_to(server_addr: &str) -> SyslogConnection {
        SyslogConnection::try_udp("127.0.0.1:0", server_addr).unwrap()
    }

    #[test]
    fn test_syslog_via_udp() {
        let server = UdpSocket::bind("127.0.0.1:0").unwrap();
        server.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let server_addr = server.local_addr().unwrap().to_string();

        let logger = LoggerBuilder::try_from_config(&test_utils::extra_config(json!({
            "level": "WARNING",
            "prefix": "JustForTest",
            "syslog": true,
        })))
        .unwrap()
        .syslog_connection(udp_to(&server_addr))
        .syslog_facility(SyslogFacility::LocalUse0)
        .registry(BackendRegistry::new())
        .start()
        .unwrap_or_else(|e| panic!("Logger initialization failed with {e}"));

        logger.info(&[&"This is an info message - you must not see it!"]);
        logger.error(&[&"This is a syslog-relevant error message"]);
        logger.warning(&[&"This is a syslog-relevant warning"]);

        let pid_part = format!(" JustForTest[{}]: ", std::process::id());
        let entry = receive(&server);
        assert!(entry.starts_with("<131>"), "{entry}");
        assert!(entry.contains(&pid_part), "{entry}");
        assert!(entry.ends_with(" This is a syslog-relevant error message"), "{entry}");

        let entry = receive(&server);
        assert!(entry.starts_with("<132>"), "{entry}");
        assert!(entry.ends_with(" This is a syslog-relevant warning"), "{entry}");
    }

    #[test]
    fn test_logstash_to_syslog_uses_program_name() {
        let server = UdpSocket::bind("127.0.0.1:0").unwrap();
        server.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let server_addr = server.local_addr().unwrap().to_string();

        let logger = LoggerBuilder::try_from_config(&test_utils::extra_config(json!({
            "level": "DEBUG",
            "prefix": "ignored",
            "syslog": true,
            "format": "logstash",
        })))
        .unwrap()
        .syslog_connection(udp_to(&server_addr))
        .registry(BackendRegistry::new())
        .start()
        .unwrap();

        logger.debug(&[&"as json"]);
        let entry = receive(&server);
        assert!(entry.starts_with("<15>"), "{entry}");
        assert!(!entry.contains("ignored"), "{entry}");
        let (_, payload) = entry.split_once("]: ").unwrap();
        let value: serde_json::Value = serde_json::from_str(payload).unwrap();
        assert_eq!(value["message"], "as json");
    }

    #[test]
    fn test_default_connection_is_local_syslog() {
        let registry = BackendRegistry::new();
        let result = LoggerBuilder::try_from_config(&test_utils::extra_config(json!({
            "level": "INFO",
            "prefix": "krakend-logging-test",
            "syslog": true,
        })))
        .unwrap()
        .registry(registry.clone())
        .start();

        match (SyslogConnection::try_local(), result) {
            (Ok(_), Ok(logger)) => {
                assert_eq!(registry.active_backends().unwrap(), 1);
                logger.info(&[&"local syslog reached"]);
                logger.flush();
            }
            (Err(_), Err(LoggingError::Syslog(_))) => {
                assert_eq!(registry.active_backends().unwrap(), 0);
            }
            (Ok(_), Err(e)) => panic!("local syslog exists, but start failed with {e}"),
            (Err(e), Ok(_)) => panic!("no local syslog ({e}), but start succeeded"),
            (Err(_), Err(e)) => panic!("unexpected error {e}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_socket_paths() {
        for path in ["/nonexistent/krakend.sock", ""] {
            assert!(SyslogConnection::try_datagram(path).is_err());
            assert!(SyslogConnection::try_stream(path).is_err());
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_syslog_call() {
        let registry = BackendRegistry::new();
        let logger = LoggerBuilder::try_from_config(&test_utils::extra_config(json!({
            "level": "DEBUG",
            "prefix": "krakend-logging-test",
            "syslog": true,
        })))
        .unwrap()
        .syslog_connection(SyslogConnection::syslog_call())
        .syslog_facility(SyslogFacility::LocalUse7)
        .registry(registry.clone())
        .start()
        .unwrap_or_else(|e| panic!("Logger initialization failed with {e}"));

        assert_eq!(registry.active_backends().unwrap(), 1);
        assert!(logger.is_enabled_for(Severity::Debug));
        logger.debug(&[&"syslog(3)", &"debug"]);
        logger.info(&[&"syslog(3)", &"info"]);
        logger.warning(&[&"syslog(3)", &"warning"]);
        logger.error(&[&"syslog(3)", &"error"]);
        logger.critical(&[&"syslog(3)", &"critical"]);
        logger.flush();
    }

    #[cfg(unix)]
    #[test]
    fn test_cron_with_syslog_call_is_rejected() {
        let (logger, buffer, registry) =
            test_utils::buffer_logger(json!({"level": "INFO", "prefix": "pref"}));

        let result = LoggerBuilder::try_from_config(&test_utils::extra_config(json!({
            "level": "INFO",
            "syslog": true,
        })))
        .unwrap()
        .syslog_connection(SyslogConnection::syslog_call())
        .syslog_facility(SyslogFacility::Clock)
        .registry(registry.clone())
        .start();
        match result {
            Err(LoggingError::Syslog(e)) => {
                assert_eq!(e.kind(), std::io::ErrorKind::Unsupported);
            }
            Err(e) => panic!("unexpected error {e}"),
            Ok(_) => panic!("cron must be rejected with syslog(3)"),
        }

        assert_eq!(registry.active_backends().unwrap(), 1);
        logger.info(&[&"unchanged"]);
        assert_eq!(test_utils::last_tokens(&buffer), vec!["unchanged"]);
    }

    #[test]
    fn test_cron_over_udp() {
        let server = UdpSocket::bind("127.0.0.1:0").unwrap();
        server.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let server_addr = server.local_addr().unwrap().to_string();

        let logger = LoggerBuilder::try_from_config(&test_utils::extra_config(json!({
            "level": "INFO",
            "prefix": "crond",
            "syslog": true,
        })))
        .unwrap()
        .syslog_connection(udp_to(&server_addr))
        .syslog_facility(SyslogFacility::Clock)
        .registry(BackendRegistry::new())
        .start()
        .unwrap();

        logger.error(&[&"job failed"]);
        // cron (9) << 3 | err (3)
        assert!(receive(&server).starts_with("<75>"));
    }
}
