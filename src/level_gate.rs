use crate::{backend::Backend, deferred_now::DeferredNow, record::Record, Severity};
use std::collections::HashMap;

/// Wraps a [`Backend`] with a per-module severity gate.
///
/// Records of a module for which a level was set are written only if their severity
/// is at least that level; records of other modules are checked against the default
/// level, which is initially [`Severity::Debug`], i.e., they all pass.
pub struct LeveledBackend {
    module_levels: HashMap<String, Severity>,
    default_level: Severity,
    backend: Box<dyn Backend>,
}
impl LeveledBackend {
    /// Wraps the given backend; initially all records pass.
    #[must_use]
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self {
            module_levels: HashMap::new(),
            default_level: Severity::Debug,
            backend,
        }
    }

    /// Sets the minimum severity for the given module.
    #[must_use]
    pub fn with_level(mut self, level: Severity, module: &str) -> Self {
        self.module_levels.insert(module.to_owned(), level);
        self
    }

    /// Sets the minimum severity for modules without explicit level.
    #[must_use]
    pub fn with_default_level(mut self, level: Severity) -> Self {
        self.default_level = level;
        self
    }

    /// The minimum severity that applies to the given module.
    #[must_use]
    pub fn level(&self, module: &str) -> Severity {
        self.module_levels
            .get(module)
            .copied()
            .unwrap_or(self.default_level)
    }

    /// Whether a record of the given module and severity would be written.
    #[must_use]
    pub fn is_enabled_for(&self, severity: Severity, module: &str) -> bool {
        severity >= self.level(module)
    }
}

impl Backend for LeveledBackend {
    fn write(&self, now: &mut DeferredNow, record: &Record) -> std::io::Result<()> {
        if self.is_enabled_for(record.severity(), record.module()) {
            self.backend.write(now, record)
        } else {
            Ok(())
        }
    }

    fn flush(&self) -> std::io::Result<()> {
        self.backend.flush()
    }

    fn shutdown(&self) {
        self.backend.shutdown();
    }
}

#[cfg(test)]
mod test {
    use super::LeveledBackend;
    use crate::{
        backend::{Backend, WriterBackend},
        deferred_now::DeferredNow,
        formats::Pattern,
        record::Record,
        writers::BufferWriter,
        Severity,
    };

    #[test]
    fn test_gate_per_module() {
        let buffer = BufferWriter::new();
        let gate = LeveledBackend::new(Box::new(WriterBackend::new(
            Box::new(buffer.clone()),
            "",
            Pattern::parse("%{module} %{message}").unwrap(),
        )))
        .with_level(Severity::Error, "KRAKEND");

        assert_eq!(gate.level("KRAKEND"), Severity::Error);
        assert_eq!(gate.level("OTHER"), Severity::Debug);

        for (module, severity, msg) in [
            ("KRAKEND", Severity::Warning, "hidden"),
            ("KRAKEND", Severity::Error, "shown"),
            ("KRAKEND", Severity::Critical, "shown too"),
            ("OTHER", Severity::Debug, "other module"),
        ] {
            let record = Record::new(0, severity, module, msg.to_owned(), None);
            gate.write(&mut DeferredNow::new(), &record).unwrap();
        }
        assert_eq!(
            buffer.contents(),
            "KRAKEND shown\nKRAKEND shown too\nOTHER other module\n"
        );
    }
}
