use crate::{
    deferred_now::DeferredNow,
    formats::Pattern,
    record::Record,
    util::{io_err, write_buffered},
};
use std::{io::Write, sync::Mutex};

/// Writes log records to a single output.
///
/// Boxed instances of `Backend` are assembled by the factory; you can also
/// implement it yourself and add it with
/// [`LoggerBuilder::add_backend`](crate::LoggerBuilder::add_backend).
pub trait Backend: Sync + Send {
    /// Writes out a log record.
    ///
    /// # Errors
    ///
    /// `std::io::Error` if writing to the output fails.
    fn write(&self, now: &mut DeferredNow, record: &Record) -> std::io::Result<()>;

    /// Flushes any buffered records.
    ///
    /// # Errors
    ///
    /// `std::io::Error` if flushing the output fails.
    fn flush(&self) -> std::io::Result<()>;

    /// Cleanup open resources, if necessary.
    fn shutdown(&self) {}
}

/// A [`Backend`] that renders each record with a [`Pattern`], prepends a prefix,
/// and writes the line to an arbitrary `std::io::Write`.
///
/// The writer is protected by a mutex, so lines from concurrent log calls
/// never interleave.
pub struct WriterBackend {
    prefix: String,
    pattern: Pattern,
    m_writer: Mutex<Box<dyn Write + Send>>,
}
impl WriterBackend {
    /// Creates a backend.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, prefix: impl Into<String>, pattern: Pattern) -> Self {
        Self {
            prefix: prefix.into(),
            pattern,
            m_writer: Mutex::new(writer),
        }
    }
}
impl Backend for WriterBackend {
    fn write(&self, now: &mut DeferredNow, record: &Record) -> std::io::Result<()> {
        let mut writer = self
            .m_writer
            .lock()
            .map_err(|_| io_err("WriterBackend is poisoned"))?;
        write_buffered(&self.prefix, &self.pattern, now, record, &mut **writer)
    }

    fn flush(&self) -> std::io::Result<()> {
        self.m_writer
            .lock()
            .map_err(|_| io_err("WriterBackend is poisoned"))?
            .flush()
    }
}

#[cfg(test)]
mod test {
    use super::{Backend, WriterBackend};
    use crate::{
        deferred_now::DeferredNow, formats::Pattern, record::Record, writers::BufferWriter,
        Severity,
    };

    #[test]
    fn test_writer_backend() {
        let buffer = BufferWriter::new();
        let backend = WriterBackend::new(
            Box::new(buffer.clone()),
            "pref",
            Pattern::parse(" %{level} %{message}").unwrap(),
        );
        for (severity, msg) in [(Severity::Error, "first"), (Severity::Debug, "second")] {
            let record = Record::new(0, severity, "KRAKEND", msg.to_owned(), None);
            backend.write(&mut DeferredNow::new(), &record).unwrap();
        }
        backend.flush().unwrap();
        assert_eq!(buffer.contents(), "pref ERROR first\npref DEBUG second\n");
    }
}
