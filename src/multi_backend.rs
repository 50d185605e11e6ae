use crate::{
    backend::Backend,
    deferred_now::DeferredNow,
    level_gate::LeveledBackend,
    record::Record,
    util::{eprint_err, ErrorCode},
    LoggingError, Severity,
};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, OnceLock, RwLock,
};

// The `MultiBackend` hands each record to all of its leveled backends.
//
// It is immutable once built; reconfiguration means building a new one and
// installing it in a `BackendRegistry`.
pub(crate) struct MultiBackend {
    backends: Vec<LeveledBackend>,
}
impl MultiBackend {
    pub(crate) fn new(backends: Vec<LeveledBackend>) -> Self {
        Self { backends }
    }

    pub(crate) fn len(&self) -> usize {
        self.backends.len()
    }

    // A failing backend does not keep the others from getting the record.
    pub(crate) fn write(&self, now: &mut DeferredNow, record: &Record) {
        for backend in &self.backends {
            backend
                .write(now, record)
                .unwrap_or_else(|e| eprint_err(ErrorCode::Write, "writing log line failed", &e));
        }
    }

    pub(crate) fn is_enabled_for(&self, severity: Severity, module: &str) -> bool {
        self.backends
            .iter()
            .any(|b| b.is_enabled_for(severity, module))
    }

    pub(crate) fn flush(&self) {
        for backend in &self.backends {
            backend
                .flush()
                .unwrap_or_else(|e| eprint_err(ErrorCode::Flush, "flushing backend failed", &e));
        }
    }
}
impl Drop for MultiBackend {
    fn drop(&mut self) {
        self.flush();
        for backend in &self.backends {
            backend.shutdown();
        }
    }
}

/// Owns the set of backends that is currently active.
///
/// Every [`Logger`](crate::Logger) is bound to a registry and writes to whatever backend
/// set is active in it *at the time of the log call*. Building a new logger with the same
/// registry therefore also changes the output of all loggers that were built before.
///
/// [`new_logger`](crate::new_logger) uses the process-wide instance
/// [`BackendRegistry::global`]; use your own instances (see
/// [`LoggerBuilder::registry`](crate::LoggerBuilder::registry)) to keep independent
/// logger families apart, e.g. in tests.
pub struct BackendRegistry {
    active: RwLock<Arc<MultiBackend>>,
    sequence: AtomicU64,
}
impl Default for BackendRegistry {
    fn default() -> Self {
        Self {
            active: RwLock::new(Arc::new(MultiBackend::new(Vec::new()))),
            sequence: AtomicU64::new(0),
        }
    }
}
impl BackendRegistry {
    /// Creates a registry with an empty backend set, which discards everything.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The process-wide registry.
    #[must_use]
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<BackendRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(BackendRegistry::new))
    }

    /// Number of backends in the active set.
    ///
    /// # Errors
    ///
    /// [`LoggingError::Poison`] if the registry lock is poisoned.
    pub fn active_backends(&self) -> Result<usize, LoggingError> {
        Ok(self.active.read().map_err(|_| LoggingError::Poison)?.len())
    }

    // Replaces the active set; the write lock serializes concurrent installations.
    pub(crate) fn install(&self, backends: MultiBackend) -> Result<(), LoggingError> {
        let new = Arc::new(backends);
        let old = {
            let mut guard = self.active.write().map_err(|_| LoggingError::Poison)?;
            std::mem::replace(&mut *guard, new)
        };
        // the old set is flushed when its last user is gone, outside the lock
        drop(old);
        Ok(())
    }

    pub(crate) fn active(&self) -> std::io::Result<Arc<MultiBackend>> {
        self.active
            .read()
            .map(|guard| Arc::clone(&*guard))
            .map_err(|_| crate::util::io_err("BackendRegistry is poisoned"))
    }

    pub(crate) fn next_id(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }
}
