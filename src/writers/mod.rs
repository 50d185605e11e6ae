//! Sinks and backends beyond plain writers.
//!
//! Any `Box<dyn std::io::Write + Send>` can be handed to the factory as an output;
//! this module adds
//!
//! * [`BufferWriter`], a shareable in-memory sink, handy for tests and for
//!   showing recent log output in an admin endpoint,
//! * and, with crate feature `syslog_writer`, the [`SyslogBackend`] together with the
//!   means to connect to the syslog ([`SyslogConnection`]).
//!
//! ```rust
//! use krakend_logging::{writers::BufferWriter, LogFacade, LoggerBuilder, NAMESPACE};
//! use serde_json::json;
//! use std::collections::HashMap;
//!
//! let extra_config = HashMap::from([(
//!     NAMESPACE.to_owned(),
//!     json!({"level": "WARNING", "prefix": "[gw]"}),
//! )]);
//! let buffer = BufferWriter::new();
//! let logger = LoggerBuilder::try_from_config(&extra_config)
//!     .unwrap()
//!     .add_writer(Box::new(buffer.clone()))
//!     .start()
//!     .unwrap();
//!
//! logger.warning(&[&"backend", &"slow"]);
//! logger.info(&[&"not written"]);
//! assert_eq!(buffer.lines().len(), 1);
//! ```

mod buffer_writer;

#[cfg(feature = "syslog_writer")]
#[cfg_attr(docsrs, doc(cfg(feature = "syslog_writer")))]
mod syslog;

pub use self::buffer_writer::{BufferWriter, Snapshot};

#[cfg(feature = "syslog_writer")]
#[cfg_attr(docsrs, doc(cfg(feature = "syslog_writer")))]
pub use self::syslog::{SyslogBackend, SyslogConnection, SyslogFacility, SyslogSeverity};
