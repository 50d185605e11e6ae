mod connection;
mod facility;
mod line;
mod severity;
mod syslog_connection;
mod writer;

#[allow(clippy::module_name_repetitions)]
pub use self::{
    facility::SyslogFacility, severity::SyslogSeverity, syslog_connection::SyslogConnection,
    writer::SyslogBackend,
};
