use crate::Severity;

/// Syslog severity.
///
/// See [RFC 5424](https://datatracker.ietf.org/doc/rfc5424).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum SyslogSeverity {
    /// System is unusable.
    Emergency = 0,
    /// Action must be taken immediately.
    Alert = 1,
    /// Critical conditions.
    Critical = 2,
    /// Error conditions.
    Error = 3,
    /// Warning conditions
    Warning = 4,
    /// Normal but significant condition
    Notice = 5,
    /// Informational messages.
    Info = 6,
    /// Debug-level messages.
    Debug = 7,
}

impl From<Severity> for SyslogSeverity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Critical => SyslogSeverity::Critical,
            Severity::Error => SyslogSeverity::Error,
            Severity::Warning => SyslogSeverity::Warning,
            Severity::Info => SyslogSeverity::Info,
            Severity::Debug => SyslogSeverity::Debug,
        }
    }
}

impl SyslogSeverity {
    #[cfg(unix)]
    pub(super) fn to_nix(self) -> nix::syslog::Severity {
        use nix::syslog::Severity;
        match self {
            Self::Emergency => Severity::LOG_EMERG,
            Self::Alert => Severity::LOG_ALERT,
            Self::Critical => Severity::LOG_CRIT,
            Self::Error => Severity::LOG_ERR,
            Self::Warning => Severity::LOG_WARNING,
            Self::Notice => Severity::LOG_NOTICE,
            Self::Info => Severity::LOG_INFO,
            Self::Debug => Severity::LOG_DEBUG,
        }
    }
}
