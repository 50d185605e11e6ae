use super::connection::Connection;

#[cfg(unix)]
use std::path::Path;
use std::{
    io::Result as IoResult,
    net::{TcpStream, ToSocketAddrs, UdpSocket},
};

#[cfg(unix)]
const LOCAL_SYSLOG_PATHS: [&str; 3] = ["/dev/log", "/var/run/syslog", "/var/run/log"];

/// Implements the connection to the syslog.
///
/// If the configuration asks for syslog output and no connection is given explicitly
/// (see [`LoggerBuilder::syslog_connection`](crate::LoggerBuilder::syslog_connection)),
/// [`SyslogConnection::try_local`] is used.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
pub struct SyslogConnection(Connection);
impl SyslogConnection {
    /// Connects to the local syslog daemon, trying the usual unix socket paths
    /// (`/dev/log`, `/var/run/syslog`, `/var/run/log`), each first as datagram
    /// and then as stream socket.
    ///
    /// # Errors
    ///
    /// The error of the last connection attempt if none succeeds;
    /// on non-unix platforms always `ErrorKind::Unsupported`.
    pub fn try_local() -> IoResult<Self> {
        #[cfg(unix)]
        {
            let mut last_err = None;
            for path in LOCAL_SYSLOG_PATHS {
                match Self::try_datagram(path).or_else(|_| Self::try_stream(path)) {
                    Ok(conn) => return Ok(conn),
                    Err(e) => last_err = Some(e),
                }
            }
            Err(last_err.unwrap_or_else(|| crate::util::io_err("no local syslog found")))
        }
        #[cfg(not(unix))]
        {
            Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "no local syslog on this platform",
            ))
        }
    }

    /// Connects via unix datagram to the specified path.
    ///
    /// # Errors
    ///
    /// Any kind of I/O error can occur.
    #[cfg_attr(docsrs, doc(cfg(unix)))]
    #[cfg(unix)]
    pub fn try_datagram<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let ud = std::os::unix::net::UnixDatagram::unbound()?;
        ud.connect(&path)?;
        Ok(SyslogConnection(Connection::Datagram(ud)))
    }

    /// Connects via unix stream to the specified path.
    ///
    /// # Errors
    ///
    /// Any kind of I/O error can occur.
    #[cfg_attr(docsrs, doc(cfg(unix)))]
    #[cfg(unix)]
    pub fn try_stream<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        Ok(SyslogConnection(Connection::Stream(
            std::os::unix::net::UnixStream::connect(path)?,
        )))
    }

    /// Delegates to the POSIX [`syslog` C function] of the platform's C library.
    ///
    /// The C library keeps process-wide state (the ident set with `openlog`), so this
    /// connection assumes that no other code in the process configures `syslog` differently.
    ///
    /// [`syslog` C function]: https://man7.org/linux/man-pages/man3/syslog.3.html
    #[cfg_attr(docsrs, doc(cfg(unix)))]
    #[cfg(unix)]
    #[must_use]
    pub fn syslog_call() -> Self {
        SyslogConnection(Connection::SyslogCall)
    }

    /// Sends the log lines via TCP to the specified address.
    ///
    /// # Errors
    ///
    /// `std::io::Error` if opening the stream fails.
    pub fn try_tcp<T: ToSocketAddrs>(server: T) -> IoResult<Self> {
        Ok(SyslogConnection(Connection::Tcp(TcpStream::connect(
            server,
        )?)))
    }

    /// Sends the log lines via UDP from `local` to `server`.
    ///
    /// # Errors
    ///
    /// `std::io::Error` if binding or connecting the socket fails.
    pub fn try_udp<T: ToSocketAddrs>(local: T, server: T) -> IoResult<Self> {
        let socket = UdpSocket::bind(local)?;
        socket.connect(server)?;
        Ok(SyslogConnection(Connection::Udp(socket)))
    }

    pub(super) fn into_inner(self) -> Connection {
        self.0
    }
}
