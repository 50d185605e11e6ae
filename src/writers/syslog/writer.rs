use super::{connection::Connection, line::LineWriter, SyslogConnection, SyslogFacility};
use crate::{
    backend::Backend, deferred_now::DeferredNow, formats::Pattern, record::Record, util::io_err,
};
use std::{io::Write, sync::Mutex};

/// A [`Backend`] that sends each record as one entry to the syslog.
///
/// The severity of the record determines the syslog priority
/// (CRITICAL to `crit`, ERROR to `err`, WARNING to `warning`, INFO to `info`,
/// DEBUG to `debug`); the message part of the entry is rendered with the given pattern.
///
/// Only available with crate feature `syslog_writer`.
#[allow(clippy::module_name_repetitions)]
pub struct SyslogBackend {
    line_writer: LineWriter,
    conn_state: SyslogConnectionState,
}
impl SyslogBackend {
    /// Creates a syslog backend.
    ///
    /// An empty `tag` is replaced with the program name.
    ///
    /// # Errors
    ///
    /// `ErrorKind::Unsupported` if the connection is
    /// `SyslogConnection::syslog_call()` and `syslog(3)` cannot be opened with
    /// the given facility (this is the case for [`SyslogFacility::Clock`]).
    pub fn new(
        connection: SyslogConnection,
        tag: &str,
        pattern: Pattern,
        facility: SyslogFacility,
    ) -> std::io::Result<Self> {
        let conn_state = match connection.into_inner() {
            #[cfg(unix)]
            Connection::SyslogCall => {
                if facility.to_nix().is_none() {
                    return Err(facility.unsupported_by_syslog_call());
                }
                SyslogConnectionState::SyslogCall
            }
            conn => SyslogConnectionState::SocketConnection(Mutex::new(ConnectorAndBuffer {
                conn,
                buf: Vec::with_capacity(200),
            })),
        };
        let tag = if tag.is_empty() {
            crate::formats::program_name().to_owned()
        } else {
            tag.to_owned()
        };
        Ok(SyslogBackend {
            line_writer: LineWriter::new(tag, std::process::id(), pattern, facility),
            conn_state,
        })
    }
}
impl Backend for SyslogBackend {
    fn write(&self, now: &mut DeferredNow, record: &Record) -> std::io::Result<()> {
        match &self.conn_state {
            SyslogConnectionState::SocketConnection(conn_state) => {
                let mut conn_state = conn_state
                    .lock()
                    .map_err(|_| io_err("SyslogBackend is poisoned"))?;

                conn_state.buf.clear();
                self.line_writer
                    .write_to_syslog_socket_buffer(&mut conn_state.buf, now, record)?;

                // each write produces one syslog entry, so the entry is buffered first
                let conn_state = &mut *conn_state;
                conn_state.conn.write_all(&conn_state.buf)
            }
            #[cfg(unix)]
            SyslogConnectionState::SyslogCall => {
                self.line_writer.write_with_syslog_call(now, record)
            }
        }
    }

    fn flush(&self) -> std::io::Result<()> {
        match &self.conn_state {
            SyslogConnectionState::SocketConnection(conn_state) => conn_state
                .lock()
                .map_err(|_| io_err("SyslogBackend is poisoned"))?
                .conn
                .flush(),
            #[cfg(unix)]
            SyslogConnectionState::SyslogCall => Ok(()),
        }
    }

    fn shutdown(&self) {
        self.line_writer.shutdown();
    }
}

struct ConnectorAndBuffer {
    conn: Connection,
    buf: Vec<u8>,
}

enum SyslogConnectionState {
    SocketConnection(Mutex<ConnectorAndBuffer>),
    #[cfg(unix)]
    SyslogCall,
}

#[cfg(test)]
mod test {
    use super::SyslogBackend;
    use crate::{
        backend::Backend,
        deferred_now::DeferredNow,
        formats::Pattern,
        record::Record,
        writers::{SyslogConnection, SyslogFacility},
        Severity,
    };
    use std::net::UdpSocket;

    #[test]
    fn test_syslog_via_udp() {
        let server = UdpSocket::bind("127.0.0.1:0").unwrap();
        server
            .set_read_timeout(Some(std::time::Duration::from_secs(5)))
            .unwrap();
        let server_addr = server.local_addr().unwrap().to_string();

        let backend = SyslogBackend::new(
            SyslogConnection::try_udp("127.0.0.1:0", server_addr.as_str()).unwrap(),
            "pref",
            Pattern::parse("%{message}").unwrap(),
            SyslogFacility::LocalUse0,
        )
        .unwrap();

        let mut buf = [0_u8; 1024];
        for (severity, pri) in [
            (Severity::Critical, "<130>"),
            (Severity::Error, "<131>"),
            (Severity::Warning, "<132>"),
            (Severity::Info, "<134>"),
            (Severity::Debug, "<135>"),
        ] {
            let record = Record::new(1, severity, "KRAKEND", "syslog-relevant".to_owned(), None);
            backend.write(&mut DeferredNow::new(), &record).unwrap();
            let n = server.recv(&mut buf).unwrap();
            let entry = String::from_utf8_lossy(&buf[..n]);
            assert!(entry.starts_with(pri), "{entry} does not start with {pri}");
            assert!(entry.contains(&format!(" pref[{}]: ", std::process::id())));
            assert!(entry.ends_with("syslog-relevant"));
        }
        backend.flush().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_cron_needs_a_socket() {
        let pattern = || Pattern::parse("%{message}").unwrap();

        let err = SyslogBackend::new(
            SyslogConnection::syslog_call(),
            "pref",
            pattern(),
            SyslogFacility::Clock,
        )
        .err()
        .unwrap();
        assert_eq!(err.kind(), std::io::ErrorKind::Unsupported);
        assert!(err.to_string().contains("cron"), "{err}");

        let server = UdpSocket::bind("127.0.0.1:0").unwrap();
        let server_addr = server.local_addr().unwrap().to_string();
        assert!(SyslogBackend::new(
            SyslogConnection::try_udp("127.0.0.1:0", server_addr.as_str()).unwrap(),
            "pref",
            pattern(),
            SyslogFacility::Clock,
        )
        .is_ok());
    }
}
