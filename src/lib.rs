// only enables the `doc_cfg` feature when the `docsrs` configuration attribute is defined
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! A configuration-driven logging adapter for API gateways.
//!
//! The application hands over its untyped configuration bag ([`ExtraConfig`]) and
//! optionally some writers; the factory reads the section under [`NAMESPACE`],
//! builds the backends (the writers, stdout, the syslog), installs them, and returns a
//! [`Logger`] with the six methods of the generic [`LogFacade`]:
//!
//! ```rust
//! use krakend_logging::{new_logger, LogFacade, NAMESPACE};
//! use serde_json::json;
//! use std::collections::HashMap;
//!
//! let extra_config = HashMap::from([(
//!     NAMESPACE.to_owned(),
//!     json!({"level": "INFO", "prefix": "[gw]", "stdout": true}),
//! )]);
//! let logger = new_logger(&extra_config, Vec::new()).unwrap();
//! logger.info(&[&"listening on port", &8080]);
//! ```
//!
//! See
//!
//! * [`LoggingConfig`] for the configuration options,
//! * the builder [`LoggerBuilder`] for what can be adapted beyond the configuration,
//! * [`Pattern`] for the syntax of line formats,
//! * the module [`writers`] for the additional sinks,
//! * and [`BackendRegistry`] for how loggers share their backends.
//!
//! By default, i.e. if feature `colors` is not switched off, the default line format
//! colors the severity.

mod backend;
mod config;
mod deferred_now;
mod formats;
mod level_gate;
mod logger;
mod logger_handle;
mod logging_error;
mod multi_backend;
mod record;
mod severity;
mod util;

pub mod error_info;
pub mod writers;

pub use crate::backend::{Backend, WriterBackend};
pub use crate::config::{
    config_getter, extra_config_from_json_str, extra_config_from_toml_str, ExtraConfig,
    LogFormat, LoggingConfig,
};
pub use crate::deferred_now::DeferredNow;
pub use crate::formats::{
    default_format_selector, FormatSelector, Pattern, SinkKind, DEFAULT_PATTERN,
    LOGSTASH_PATTERN,
};
pub use crate::level_gate::LeveledBackend;
pub use crate::logger::{new_logger, LoggerBuilder};
pub use crate::logger_handle::{exit_process, FatalHook, LogFacade, Logger, NoOpLogger};
pub use crate::logging_error::LoggingError;
pub use crate::multi_backend::BackendRegistry;
pub use crate::record::{join_values, Record};
pub use crate::severity::Severity;

/// The key under which the logging configuration lives in the [`ExtraConfig`].
pub const NAMESPACE: &str = "github_com/devopsfaith/krakend-gologging";

/// The module tag that loggers use by default, and to which the configured level applies.
pub const MODULE: &str = "KRAKEND";
