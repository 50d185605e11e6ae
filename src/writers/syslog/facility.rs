use std::{fmt, str::FromStr};

/// The syslog facility of the entries, as defined in
/// [RFC 3164](https://datatracker.ietf.org/doc/rfc3164), section 4.1.1.
///
/// The discriminants are the facility codes shifted into the priority value
/// (i.e. multiplied by 8), so that `facility as u8 | severity as u8` is the priority.
///
/// Facilities can also be parsed from their conventional names (`"user"`, `"daemon"`,
/// `"local0"`, ...).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum SyslogFacility {
    /// `kern`
    Kernel = 0 << 3,
    /// `user`, the default for application logs.
    #[default]
    UserLevel = 1 << 3,
    /// `mail`
    MailSystem = 2 << 3,
    /// `daemon`
    SystemDaemons = 3 << 3,
    /// `auth`
    Authorization = 4 << 3,
    /// `syslog`
    SyslogD = 5 << 3,
    /// `lpr`
    LinePrinter = 6 << 3,
    /// `news`
    News = 7 << 3,
    /// `uucp`
    Uucp = 8 << 3,
    /// `cron`
    Clock = 9 << 3,
    /// `local0`
    LocalUse0 = 16 << 3,
    /// `local1`
    LocalUse1 = 17 << 3,
    /// `local2`
    LocalUse2 = 18 << 3,
    /// `local3`
    LocalUse3 = 19 << 3,
    /// `local4`
    LocalUse4 = 20 << 3,
    /// `local5`
    LocalUse5 = 21 << 3,
    /// `local6`
    LocalUse6 = 22 << 3,
    /// `local7`
    LocalUse7 = 23 << 3,
}

// name, facility, and the matching nix constant if nix has one
macro_rules! facility_table {
    (@nix) => { None };
    (@nix $nix:ident) => { Some(nix::syslog::Facility::$nix) };
    ($(($name:literal, $variant:ident $(, $nix:ident)?)),* $(,)?) => {
        impl SyslogFacility {
            const NAMES: &'static [(&'static str, SyslogFacility)] =
                &[$(($name, SyslogFacility::$variant)),*];

            /// `None` if `syslog(3)` cannot be opened with this facility through `nix`.
            #[cfg(unix)]
            pub(super) fn to_nix(self) -> Option<nix::syslog::Facility> {
                match self {
                    $(Self::$variant => facility_table!(@nix $($nix)?)),*
                }
            }
        }
    };
}

facility_table![
    ("kern", Kernel, LOG_KERN),
    ("user", UserLevel, LOG_USER),
    ("mail", MailSystem, LOG_MAIL),
    ("daemon", SystemDaemons, LOG_DAEMON),
    ("auth", Authorization, LOG_AUTH),
    ("syslog", SyslogD, LOG_SYSLOG),
    ("lpr", LinePrinter, LOG_LPR),
    ("news", News, LOG_NEWS),
    ("uucp", Uucp, LOG_UUCP),
    ("cron", Clock),
    ("local0", LocalUse0, LOG_LOCAL0),
    ("local1", LocalUse1, LOG_LOCAL1),
    ("local2", LocalUse2, LOG_LOCAL2),
    ("local3", LocalUse3, LOG_LOCAL3),
    ("local4", LocalUse4, LOG_LOCAL4),
    ("local5", LocalUse5, LOG_LOCAL5),
    ("local6", LocalUse6, LOG_LOCAL6),
    ("local7", LocalUse7, LOG_LOCAL7),
];

impl SyslogFacility {
    /// The conventional name, e.g. `local0`.
    #[must_use]
    pub fn name(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, facility)| *facility == self)
            .map_or("user", |(name, _)| name)
    }
}

impl SyslogFacility {
    #[cfg(unix)]
    pub(super) fn unsupported_by_syslog_call(self) -> std::io::Error {
        std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            format!("syslog facility {self} is not supported by syslog(3)"),
        )
    }
}

impl FromStr for SyslogFacility {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, facility)| *facility)
            .ok_or_else(|| format!("unknown syslog facility {s:?}"))
    }
}

impl fmt::Display for SyslogFacility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
