use crate::{
    deferred_now::DeferredNow,
    multi_backend::BackendRegistry,
    record::{join_values, Record},
    util::{eprint_err, ErrorCode},
    LoggingError, Severity,
};
use std::{fmt::Display, panic::Location, sync::Arc};

/// The generic logging interface of the application.
///
/// Each method takes a list of values; they are rendered with `Display` and joined with
/// single blanks into the message.
/// No method returns an error: problems with writing are reported on stderr.
///
/// ```rust,ignore
/// logger.info(&[&"listening on port", &8080]);
/// logger.error(&[&format_args!("backend {} failed: {}", url, err)]);
/// ```
pub trait LogFacade: Send + Sync {
    /// Logs at severity DEBUG.
    fn debug(&self, values: &[&dyn Display]);
    /// Logs at severity INFO.
    fn info(&self, values: &[&dyn Display]);
    /// Logs at severity WARNING.
    fn warning(&self, values: &[&dyn Display]);
    /// Logs at severity ERROR.
    fn error(&self, values: &[&dyn Display]);
    /// Logs at severity CRITICAL.
    fn critical(&self, values: &[&dyn Display]);
    /// Logs at severity CRITICAL and then terminates the process
    /// (or does whatever the implementation defines as fatal reaction).
    fn fatal(&self, values: &[&dyn Display]);
}

/// What a [`Logger`] does after logging a `fatal` message;
/// is called with the exit code `1`.
pub type FatalHook = fn(exit_code: i32);

/// The default [`FatalHook`]: terminates the process with the given exit code.
pub fn exit_process(exit_code: i32) {
    std::process::exit(exit_code)
}

/// The logger facade that is returned by the factory.
///
/// A `Logger` does not own its backends: it writes to whatever backend set is
/// active in its [`BackendRegistry`] at the time of each call.
/// So if another logger is built later with the same registry,
/// this logger's output goes to the new backends as well.
///
/// `Logger` is cheap to clone and can be used from many threads concurrently.
#[derive(Clone)]
pub struct Logger {
    registry: Arc<BackendRegistry>,
    module: String,
    on_fatal: FatalHook,
}
impl Logger {
    pub(crate) fn new(registry: Arc<BackendRegistry>, module: String, on_fatal: FatalHook) -> Self {
        Self {
            registry,
            module,
            on_fatal,
        }
    }

    /// The module tag under which this logger writes.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// The registry this logger writes to.
    #[must_use]
    pub fn registry(&self) -> &Arc<BackendRegistry> {
        &self.registry
    }

    /// Whether a message with the given severity would be written by any backend.
    #[must_use]
    pub fn is_enabled_for(&self, severity: Severity) -> bool {
        self.registry
            .active()
            .is_ok_and(|active| active.is_enabled_for(severity, &self.module))
    }

    /// Flushes all backends of the active set.
    pub fn flush(&self) {
        match self.registry.active() {
            Ok(active) => active.flush(),
            Err(e) => eprint_err(ErrorCode::Poison, "flushing failed", &e),
        }
    }

    /// Registers a clone of this logger as the global logger of the `log` crate,
    /// so that `log::info!` etc. are written to the same backends.
    ///
    /// The `log` levels are mapped as Error to ERROR, Warn to WARNING, Info to INFO,
    /// and Debug and Trace to DEBUG.
    ///
    /// # Errors
    ///
    /// [`LoggingError::Log`] if a global logger was already set.
    pub fn install_as_log_logger(&self) -> Result<(), LoggingError> {
        log::set_boxed_logger(Box::new(self.clone()))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }

    fn write(
        &self,
        severity: Severity,
        message: impl FnOnce() -> String,
        location: Option<(&str, u32)>,
    ) {
        let active = match self.registry.active() {
            Ok(active) => active,
            Err(e) => {
                eprint_err(ErrorCode::Poison, "access to active backends failed", &e);
                return;
            }
        };
        if active.is_enabled_for(severity, &self.module) {
            let record = Record::new(
                self.registry.next_id(),
                severity,
                &self.module,
                message(),
                location,
            );
            active.write(&mut DeferredNow::new(), &record);
        }
    }

    #[track_caller]
    fn log_values(&self, severity: Severity, values: &[&dyn Display]) {
        let location = Location::caller();
        self.write(
            severity,
            || join_values(values),
            Some((location.file(), location.line())),
        );
    }
}

impl LogFacade for Logger {
    #[track_caller]
    fn debug(&self, values: &[&dyn Display]) {
        self.log_values(Severity::Debug, values);
    }

    #[track_caller]
    fn info(&self, values: &[&dyn Display]) {
        self.log_values(Severity::Info, values);
    }

    #[track_caller]
    fn warning(&self, values: &[&dyn Display]) {
        self.log_values(Severity::Warning, values);
    }

    #[track_caller]
    fn error(&self, values: &[&dyn Display]) {
        self.log_values(Severity::Error, values);
    }

    #[track_caller]
    fn critical(&self, values: &[&dyn Display]) {
        self.log_values(Severity::Critical, values);
    }

    #[track_caller]
    fn fatal(&self, values: &[&dyn Display]) {
        self.log_values(Severity::Critical, values);
        Logger::flush(self);
        (self.on_fatal)(1);
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.is_enabled_for(Severity::from(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        self.write(
            Severity::from(record.level()),
            || record.args().to_string(),
            record.file().zip(record.line()),
        );
    }

    fn flush(&self) {
        Logger::flush(self);
    }
}

/// A [`LogFacade`] that discards everything, also `fatal` calls.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpLogger;
impl LogFacade for NoOpLogger {
    fn debug(&self, _values: &[&dyn Display]) {}
    fn info(&self, _values: &[&dyn Display]) {}
    fn warning(&self, _values: &[&dyn Display]) {}
    fn error(&self, _values: &[&dyn Display]) {}
    fn critical(&self, _values: &[&dyn Display]) {}
    fn fatal(&self, _values: &[&dyn Display]) {}
}
