use chrono::{DateTime, Local, SecondsFormat};

/// Deferred timestamp creation.
///
/// Is used to ensure that a log record that is sent to multiple backends
/// (in maybe different formats) always uses the same timestamp.
#[derive(Debug)]
pub struct DeferredNow(Option<DateTime<Local>>);
impl Default for DeferredNow {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> DeferredNow {
    /// Constructs a new instance, but does not generate the timestamp.
    #[must_use]
    pub fn new() -> Self {
        Self(None)
    }

    /// Retrieve the timestamp.
    ///
    /// Requires mutability because the first caller will generate the timestamp.
    pub fn now(&'a mut self) -> &'a DateTime<Local> {
        self.0.get_or_insert_with(Local::now)
    }

    /// Convert into a formatted String, using a chrono strftime format.
    ///
    /// Invalid format items are rendered as an error marker instead of panicking.
    pub fn format(&'a mut self, fmt: &str) -> String {
        use std::fmt::Write;
        let mut s = String::new();
        if write!(s, "{}", self.now().format(fmt)).is_err() {
            s.clear();
            s.push_str("<invalid time format>");
        }
        s
    }

    pub(crate) fn format_rfc3339(&mut self) -> String {
        self.now().to_rfc3339_opts(SecondsFormat::Millis, false)
    }

    #[cfg(feature = "syslog_writer")]
    pub(crate) fn format_rfc3164(&mut self) -> String {
        self.now().format("%b %e %H:%M:%S").to_string()
    }
}
