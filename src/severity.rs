use crate::LoggingError;
use std::{fmt, str::FromStr};

/// The severity of a log record, in ascending order.
///
/// A backend whose gate is set to severity `S` writes all records with a severity
/// greater than or equal to `S`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Detailed diagnostic output.
    Debug,
    /// Normal operational messages.
    Info,
    /// Something unexpected, but handled.
    Warning,
    /// An operation failed.
    Error,
    /// The service is in trouble; also used for `fatal` log calls.
    Critical,
}

impl Severity {
    /// All severities, from the least to the most severe.
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    /// The upper-case name, as used in the configuration and in rendered log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }

    /// Parses a severity name; the comparison ignores ASCII case.
    ///
    /// # Errors
    ///
    /// [`LoggingError::InvalidLogLevel`] if the name is not one of the five known names.
    pub fn parse(name: &str) -> Result<Self, LoggingError> {
        Self::ALL
            .into_iter()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| LoggingError::InvalidLogLevel(name.to_owned()))
    }
}

impl FromStr for Severity {
    type Err = LoggingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::Error,
            log::Level::Warn => Severity::Warning,
            log::Level::Info => Severity::Info,
            log::Level::Debug | log::Level::Trace => Severity::Debug,
        }
    }
}
