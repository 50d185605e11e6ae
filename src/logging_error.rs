use thiserror::Error;

/// Describes errors in the construction of a [`Logger`](crate::Logger).
///
/// All of them are reported synchronously by the factory; a failed construction
/// leaves the active backend set of the registry untouched, so calling again with a
/// corrected configuration is safe.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LoggingError {
    /// The extra configuration has no (usable) entry under [`NAMESPACE`](crate::NAMESPACE).
    #[error("getting the extra config for the krakend-gologging module")]
    WrongConfig,

    /// A field of the logging configuration is present but has the wrong type.
    #[error("invalid field type for key {key}: expected {expected}")]
    InvalidFieldType {
        /// The offending configuration key.
        key: &'static str,
        /// The type that was expected for this key.
        expected: &'static str,
    },

    /// The configured level is not one of DEBUG, INFO, WARNING, ERROR, CRITICAL.
    #[error("logger: invalid log level {0:?}")]
    InvalidLogLevel(String),

    /// The line pattern could not be parsed.
    #[error("invalid log pattern: {0}")]
    InvalidPattern(String),

    /// The connection to the syslog could not be established.
    #[error("syslog backend cannot be created")]
    Syslog(#[source] std::io::Error),

    /// A configuration document could not be parsed.
    #[error("configuration document cannot be parsed: {0}")]
    Parse(String),

    /// Registering with the `log` crate failed.
    #[error("logger initialization failed")]
    Log(#[from] log::SetLoggerError),

    /// Some mutex is poisoned.
    #[error("some mutex is poisoned")]
    Poison,
}
