use crate::{
    backend::{Backend, WriterBackend},
    config::{config_getter, ExtraConfig, LogFormat, LoggingConfig},
    formats::{default_format_selector, FormatSelector, Pattern, SinkKind},
    level_gate::LeveledBackend,
    logger_handle::{exit_process, FatalHook, Logger},
    multi_backend::{BackendRegistry, MultiBackend},
    LoggingError, Severity, DEFAULT_PATTERN, LOGSTASH_PATTERN, MODULE,
};
#[cfg(feature = "syslog_writer")]
use crate::writers::{SyslogBackend, SyslogConnection, SyslogFacility};
use std::{io::Write, sync::Arc};

/// Builds a [`Logger`] from the configuration bag and a list of writers,
/// using the process-wide [`BackendRegistry`].
///
/// This is a shortcut for
///
/// ```rust,ignore
/// LoggerBuilder::try_from_config(extra_config)?
///     .add_writers(writers)
///     .start()
/// ```
///
/// # Errors
///
/// See [`LoggerBuilder::try_from_config`] and [`LoggerBuilder::start`].
pub fn new_logger(
    extra_config: &ExtraConfig,
    writers: Vec<Box<dyn Write + Send>>,
) -> Result<Logger, LoggingError> {
    LoggerBuilder::try_from_config(extra_config)?
        .add_writers(writers)
        .start()
}

/// The factory for [`Logger`]s.
///
/// Start with [`LoggerBuilder::try_from_config`] (or [`LoggerBuilder::with_config`]),
/// add the writers you want to log to in addition to what the configuration asks for,
/// optionally adapt further settings, and finally call [`LoggerBuilder::start`].
///
/// ## Example
///
/// Write warnings and worse to a file and, depending on the configuration, to stdout:
///
/// ```rust,ignore
/// use krakend_logging::{LogFacade, LoggerBuilder};
///
/// let logger = LoggerBuilder::try_from_config(&extra_config)?
///     .add_writer(Box::new(std::fs::File::create("gateway.log")?))
///     .start()?;
/// logger.warning(&[&"circuit breaker open for", &backend_url]);
/// ```
pub struct LoggerBuilder {
    config: LoggingConfig,
    writers: Vec<Box<dyn Write + Send>>,
    backends: Vec<Box<dyn Backend>>,
    format_selector: FormatSelector,
    on_fatal: FatalHook,
    o_registry: Option<Arc<BackendRegistry>>,
    module: String,
    #[cfg(feature = "syslog_writer")]
    o_syslog_connection: Option<SyslogConnection>,
    #[cfg(feature = "syslog_writer")]
    syslog_facility: SyslogFacility,
}

impl LoggerBuilder {
    /// Reads the [`LoggingConfig`] from the configuration bag.
    ///
    /// # Errors
    ///
    /// [`LoggingError::WrongConfig`] if the bag has no usable entry under
    /// [`NAMESPACE`](crate::NAMESPACE),
    /// [`LoggingError::InvalidFieldType`] if a field has the wrong type.
    pub fn try_from_config(extra_config: &ExtraConfig) -> Result<Self, LoggingError> {
        config_getter(extra_config)?
            .map(Self::with_config)
            .ok_or(LoggingError::WrongConfig)
    }

    /// Starts from an already extracted configuration.
    #[must_use]
    pub fn with_config(config: LoggingConfig) -> Self {
        Self {
            config,
            writers: Vec::new(),
            backends: Vec::new(),
            format_selector: default_format_selector,
            on_fatal: exit_process,
            o_registry: None,
            module: MODULE.to_owned(),
            #[cfg(feature = "syslog_writer")]
            o_syslog_connection: None,
            #[cfg(feature = "syslog_writer")]
            syslog_facility: SyslogFacility::default(),
        }
    }

    /// Adds a writer to which the log lines are written.
    #[must_use]
    pub fn add_writer(mut self, writer: Box<dyn Write + Send>) -> Self {
        self.writers.push(writer);
        self
    }

    /// Adds several writers.
    #[must_use]
    pub fn add_writers(mut self, writers: impl IntoIterator<Item = Box<dyn Write + Send>>) -> Self {
        self.writers.extend(writers);
        self
    }

    /// Adds a backend of your own; it is gated with the configured level like all others,
    /// but it renders the records itself.
    #[must_use]
    pub fn add_backend(mut self, backend: Box<dyn Backend>) -> Self {
        self.backends.push(backend);
        self
    }

    /// Chooses the pattern per sink; by default, all sinks use the pattern that
    /// results from the configuration.
    #[must_use]
    pub fn format_selector(mut self, format_selector: FormatSelector) -> Self {
        self.format_selector = format_selector;
        self
    }

    /// Replaces what happens after a `fatal` message was logged;
    /// the default is [`exit_process`].
    #[must_use]
    pub fn on_fatal(mut self, on_fatal: FatalHook) -> Self {
        self.on_fatal = on_fatal;
        self
    }

    /// Installs the backends in the given registry rather than in
    /// [`BackendRegistry::global`].
    #[must_use]
    pub fn registry(mut self, registry: Arc<BackendRegistry>) -> Self {
        self.o_registry = Some(registry);
        self
    }

    /// Changes the module tag of the logger; the default is [`MODULE`].
    ///
    /// The configured level applies to this module.
    #[must_use]
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Uses the given connection if the configuration asks for syslog output;
    /// by default [`SyslogConnection::try_local`] is used.
    ///
    /// Only available with crate feature `syslog_writer`.
    #[cfg(feature = "syslog_writer")]
    #[cfg_attr(docsrs, doc(cfg(feature = "syslog_writer")))]
    #[must_use]
    pub fn syslog_connection(mut self, connection: SyslogConnection) -> Self {
        self.o_syslog_connection = Some(connection);
        self
    }

    /// Sets the syslog facility; the default is [`SyslogFacility::UserLevel`].
    ///
    /// Only available with crate feature `syslog_writer`.
    #[cfg(feature = "syslog_writer")]
    #[cfg_attr(docsrs, doc(cfg(feature = "syslog_writer")))]
    #[must_use]
    pub fn syslog_facility(mut self, facility: SyslogFacility) -> Self {
        self.syslog_facility = facility;
        self
    }

    /// Builds all backends, installs them as the active set of the registry
    /// (replacing the previous set), and returns the logger.
    ///
    /// Sinks are, in this order: the added writers, stdout (if configured),
    /// the syslog (if configured), and the added backends.
    /// With zero sinks, the logger discards everything.
    ///
    /// Either all backends are built and installed, or the registry stays unchanged.
    ///
    /// The level is validated before any sink is considered, so a valid level is
    /// required even when no sink is configured.
    ///
    /// # Errors
    ///
    /// - [`LoggingError::InvalidLogLevel`] if the configured level is unknown or empty,
    /// - [`LoggingError::InvalidPattern`] if a pattern cannot be parsed,
    /// - [`LoggingError::Syslog`] if the syslog connection cannot be established,
    ///   or if `SyslogConnection::syslog_call()` is combined with a facility that
    ///   `syslog(3)` does not support,
    /// - [`LoggingError::Poison`] if the registry lock is poisoned.
    pub fn start(self) -> Result<Logger, LoggingError> {
        let LoggerBuilder {
            config,
            writers,
            backends,
            format_selector,
            on_fatal,
            o_registry,
            module,
            #[cfg(feature = "syslog_writer")]
            o_syslog_connection,
            #[cfg(feature = "syslog_writer")]
            syslog_facility,
        } = self;

        let level = Severity::parse(&config.level)?;

        let (active_pattern, prefix) = match config.log_format() {
            LogFormat::Default => (DEFAULT_PATTERN, config.prefix.as_str()),
            LogFormat::Logstash => (LOGSTASH_PATTERN, ""),
            LogFormat::Custom => (config.custom_format.as_str(), ""),
        };
        let pattern_for = |sink: SinkKind| Pattern::parse(&format_selector(&sink, active_pattern));

        let mut sinks: Vec<Box<dyn Backend>> = Vec::with_capacity(writers.len() + 2);
        for (index, writer) in writers.into_iter().enumerate() {
            sinks.push(Box::new(WriterBackend::new(
                writer,
                prefix,
                pattern_for(SinkKind::Writer(index))?,
            )));
        }
        if config.stdout {
            sinks.push(Box::new(WriterBackend::new(
                Box::new(std::io::stdout()),
                prefix,
                pattern_for(SinkKind::Stdout)?,
            )));
        }
        if config.syslog {
            #[cfg(feature = "syslog_writer")]
            {
                let pattern = pattern_for(SinkKind::Syslog)?;
                let connection = match o_syslog_connection {
                    Some(connection) => connection,
                    None => SyslogConnection::try_local().map_err(LoggingError::Syslog)?,
                };
                sinks.push(Box::new(
                    SyslogBackend::new(connection, prefix, pattern, syslog_facility)
                        .map_err(LoggingError::Syslog)?,
                ));
            }
            #[cfg(not(feature = "syslog_writer"))]
            return Err(LoggingError::Syslog(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "syslog output requires crate feature syslog_writer",
            )));
        }
        sinks.extend(backends);

        let leveled = sinks
            .into_iter()
            .map(|backend| LeveledBackend::new(backend).with_level(level, &module))
            .collect();

        let registry = o_registry.unwrap_or_else(BackendRegistry::global);
        registry.install(MultiBackend::new(leveled))?;
        Ok(Logger::new(registry, module, on_fatal))
    }
}
