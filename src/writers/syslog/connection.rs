use std::{
    io::{Result as IoResult, Write},
    net::{TcpStream, UdpSocket},
};

// Writable and flushable connection to the syslog.
#[derive(Debug)]
pub(super) enum Connection {
    // Unix datagram socket, e.g. /dev/log on linux.
    #[cfg(unix)]
    Datagram(std::os::unix::net::UnixDatagram),

    // Unix stream socket; each entry is terminated with a NUL byte.
    #[cfg(unix)]
    Stream(std::os::unix::net::UnixStream),

    // POSIX `syslog(3)`; priority and framing are handled by the C library.
    #[cfg(unix)]
    SyslogCall,

    Udp(UdpSocket),

    // Each entry is terminated with a line break.
    Tcp(TcpStream),
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
        match *self {
            #[cfg(unix)]
            Self::Datagram(ref ud) => ud.send(buf),
            // a stream entry is only complete with its terminator,
            // so the whole buffer is written before it
            #[cfg(unix)]
            Self::Stream(ref mut w) => {
                w.write_all(buf)?;
                w.write_all(&[0; 1])?;
                Ok(buf.len())
            }
            #[cfg(unix)]
            Self::SyslogCall => Ok(buf.len()),
            Self::Tcp(ref mut w) => {
                w.write_all(buf)?;
                w.write_all(b"\n")?;
                Ok(buf.len())
            }
            Self::Udp(ref socket) => socket.send(buf),
        }
    }

    fn flush(&mut self) -> IoResult<()> {
        match *self {
            #[cfg(unix)]
            Self::Stream(ref mut w) => w.flush(),
            Self::Tcp(ref mut w) => w.flush(),
            #[cfg(unix)]
            Self::Datagram(_) | Self::SyslogCall => Ok(()),
            Self::Udp(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Connection;
    use std::{
        io::{Read, Write},
        net::{TcpListener, TcpStream},
        thread,
    };

    const ENTRY_LEN: usize = 1 << 20;

    // writes two large entries and returns them as split by the terminator
    fn write_two_entries<R>(mut conn: Connection, mut reader: R, terminator: u8) -> Vec<Vec<u8>>
    where
        R: Read + Send + 'static,
    {
        let receiver = thread::spawn(move || {
            let mut received = Vec::new();
            reader.read_to_end(&mut received).unwrap();
            received
        });
        conn.write_all(&vec![b'a'; ENTRY_LEN]).unwrap();
        conn.write_all(&vec![b'b'; ENTRY_LEN]).unwrap();
        conn.flush().unwrap();
        drop(conn);

        let received = receiver.join().unwrap();
        assert_eq!(received.last(), Some(&terminator));
        received[..received.len() - 1]
            .split(|b| *b == terminator)
            .map(<[u8]>::to_vec)
            .collect()
    }

    fn assert_whole_entries(entries: &[Vec<u8>]) {
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], vec![b'a'; ENTRY_LEN]);
        assert_eq!(entries[1], vec![b'b'; ENTRY_LEN]);
    }

    #[test]
    fn test_tcp_terminates_whole_entries() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let conn = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
        let (server_side, _) = listener.accept().unwrap();

        assert_whole_entries(&write_two_entries(Connection::Tcp(conn), server_side, b'\n'));
    }

    #[cfg(unix)]
    #[test]
    fn test_unix_stream_terminates_whole_entries() {
        let (conn, server_side) = std::os::unix::net::UnixStream::pair().unwrap();

        assert_whole_entries(&write_two_entries(Connection::Stream(conn), server_side, 0));
    }
}
