use crate::{LoggingError, NAMESPACE};
use serde_derive::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// The untyped configuration bag of the application: configuration sections,
/// keyed by the namespace of the component they belong to.
pub type ExtraConfig = HashMap<String, Value>;

/// The typed configuration of the logging backends.
///
/// In the [`ExtraConfig`] it lives under [`NAMESPACE`], e.g. (JSON):
///
/// ```json
/// {
///   "github_com/devopsfaith/krakend-gologging": {
///     "level": "WARNING",
///     "prefix": "[KRAKEND]",
///     "syslog": false,
///     "stdout": true,
///     "format": "logstash"
///   }
/// }
/// ```
///
/// All fields are optional; booleans default to `false`, strings to the empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum severity: one of DEBUG, INFO, WARNING, ERROR, CRITICAL.
    pub level: String,
    /// Whether to write to the process's standard output.
    pub stdout: bool,
    /// Whether to write to the syslog.
    pub syslog: bool,
    /// Written in front of every line; ignored with the logstash and custom formats.
    pub prefix: String,
    /// `""` (default pattern), `"logstash"`, or `"custom"`.
    pub format: String,
    /// The pattern to use with `format = "custom"`.
    pub custom_format: String,
}

/// Typed view on [`LoggingConfig::format`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Use [`DEFAULT_PATTERN`](crate::DEFAULT_PATTERN); also used for unknown values.
    Default,
    /// Use [`LOGSTASH_PATTERN`](crate::LOGSTASH_PATTERN), without prefix.
    Logstash,
    /// Use the configured `custom_format`, without prefix.
    Custom,
}

impl LoggingConfig {
    /// Interprets the `format` field.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        match self.format.as_str() {
            "logstash" => LogFormat::Logstash,
            "custom" => LogFormat::Custom,
            _ => LogFormat::Default,
        }
    }

    /// Produces an [`ExtraConfig`] that contains this configuration under [`NAMESPACE`].
    #[must_use]
    pub fn into_extra_config(self) -> ExtraConfig {
        HashMap::from([(
            NAMESPACE.to_owned(),
            json!({
                "level": self.level,
                "stdout": self.stdout,
                "syslog": self.syslog,
                "prefix": self.prefix,
                "format": self.format,
                "custom_format": self.custom_format,
            }),
        )])
    }
}

/// Extracts the [`LoggingConfig`] from the configuration bag.
///
/// Returns `Ok(None)` if there is no entry under [`NAMESPACE`], or if the entry is not
/// a map. Missing fields take their defaults.
///
/// # Errors
///
/// [`LoggingError::InvalidFieldType`] if a field is present but has the wrong type
/// (including `null`).
pub fn config_getter(extra_config: &ExtraConfig) -> Result<Option<LoggingConfig>, LoggingError> {
    let Some(Value::Object(section)) = extra_config.get(NAMESPACE) else {
        return Ok(None);
    };
    Ok(Some(LoggingConfig {
        stdout: get_bool(section, "stdout")?,
        syslog: get_bool(section, "syslog")?,
        level: get_string(section, "level")?,
        prefix: get_string(section, "prefix")?,
        format: get_string(section, "format")?,
        custom_format: get_string(section, "custom_format")?,
    }))
}

fn get_bool(section: &Map<String, Value>, key: &'static str) -> Result<bool, LoggingError> {
    match section.get(key) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(LoggingError::InvalidFieldType {
            key,
            expected: "bool",
        }),
    }
}

fn get_string(section: &Map<String, Value>, key: &'static str) -> Result<String, LoggingError> {
    match section.get(key) {
        None => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(LoggingError::InvalidFieldType {
            key,
            expected: "string",
        }),
    }
}

/// Parses a JSON document whose top level object is the configuration bag.
///
/// # Errors
///
/// [`LoggingError::Parse`] if the document is not valid JSON or its top level is not an
/// object.
pub fn extra_config_from_json_str(s: &str) -> Result<ExtraConfig, LoggingError> {
    serde_json::from_str(s).map_err(|e| LoggingError::Parse(e.to_string()))
}

/// Parses a TOML document whose top level table is the configuration bag.
///
/// The namespace contains slashes, so it must be quoted:
///
/// ```toml
/// ["github_com/devopsfaith/krakend-gologging"]
/// level = "INFO"
/// stdout = true
/// ```
///
/// # Errors
///
/// [`LoggingError::Parse`] if the document is not valid TOML.
pub fn extra_config_from_toml_str(s: &str) -> Result<ExtraConfig, LoggingError> {
    toml::from_str(s).map_err(|e| LoggingError::Parse(e.to_string()))
}
