use crate::Severity;
use std::fmt::{self, Write};

/// A single log event, as it is handed to the backends.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    id: u64,
    severity: Severity,
    module: &'a str,
    message: String,
    location: Option<(&'a str, u32)>,
}

impl<'a> Record<'a> {
    /// Creates a record.
    #[must_use]
    pub fn new(
        id: u64,
        severity: Severity,
        module: &'a str,
        message: String,
        location: Option<(&'a str, u32)>,
    ) -> Self {
        Self {
            id,
            severity,
            module,
            message,
            location,
        }
    }

    /// Sequence number, unique per [`BackendRegistry`](crate::BackendRegistry).
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The module tag of the logger that produced the record.
    #[must_use]
    pub fn module(&self) -> &str {
        self.module
    }

    /// The rendered message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Source file of the log call, if known.
    #[must_use]
    pub fn file(&self) -> Option<&str> {
        self.location.map(|(file, _)| file)
    }

    /// Source line of the log call, if known.
    #[must_use]
    pub fn line(&self) -> Option<u32> {
        self.location.map(|(_, line)| line)
    }
}

/// Joins the operands of a facade call into one message, separated by single blanks.
#[must_use]
pub fn join_values(values: &[&dyn fmt::Display]) -> String {
    let mut message = String::with_capacity(80);
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            message.push(' ');
        }
        // writing into a String cannot fail
        write!(message, "{value}").ok();
    }
    message
}

#[cfg(test)]
mod test {
    use super::join_values;

    #[test]
    fn test_join_values() {
        assert_eq!(join_values(&[]), "");
        assert_eq!(join_values(&[&"a"]), "a");
        assert_eq!(join_values(&[&"request", &42, &'x', &1.5]), "request 42 x 1.5");
    }
}
