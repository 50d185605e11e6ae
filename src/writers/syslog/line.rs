use super::{SyslogFacility, SyslogSeverity};
use crate::{deferred_now::DeferredNow, formats::Pattern, record::Record};
use std::io::{Result as IoResult, Write};

// Renders syslog entries according to RFC 3164:
// `<PRI>TIMESTAMP TAG[PID]: MESSAGE`
pub(crate) struct LineWriter {
    tag: String,
    pid: u32,
    pattern: Pattern,
    facility: SyslogFacility,
}
impl LineWriter {
    pub(crate) fn new(tag: String, pid: u32, pattern: Pattern, facility: SyslogFacility) -> Self {
        LineWriter {
            tag,
            pid,
            pattern,
            facility,
        }
    }

    fn priority(&self, record: &Record) -> u8 {
        self.facility as u8 | SyslogSeverity::from(record.severity()) as u8
    }

    pub(crate) fn write_to_syslog_socket_buffer(
        &self,
        buffer: &mut dyn Write,
        now: &mut DeferredNow,
        record: &Record,
    ) -> IoResult<()> {
        write!(
            buffer,
            "<{}>{} {}[{}]: ",
            self.priority(record),
            now.format_rfc3164(),
            self.tag,
            self.pid
        )?;
        self.pattern.render(buffer, now, record)
    }

    // Priority, timestamp, tag and pid are added by the C library.
    #[cfg(unix)]
    pub(crate) fn write_with_syslog_call(
        &self,
        now: &mut DeferredNow,
        record: &Record,
    ) -> IoResult<()> {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let mut state = posix::STATE
            .lock()
            .map_err(|_| crate::util::io_err("LineWriter is poisoned"))?;
        state.open(&self.tag, self.facility)?;

        let mut message = Vec::with_capacity(200);
        self.pattern.render(&mut message, now, record)?;
        Ok(nix::syslog::syslog(
            SyslogSeverity::from(record.severity()).to_nix(),
            OsStr::from_bytes(&message),
        )?)
    }

    pub(crate) fn shutdown(&self) {
        #[cfg(unix)]
        posix::close();
    }
}

// `openlog` keeps a pointer to the ident and applies it process-wide,
// so the idents are leaked and `openlog` is only called when the tag changes.
#[cfg(unix)]
mod posix {
    use super::SyslogFacility;
    use std::{
        ffi::{CStr, CString},
        io::Result as IoResult,
        sync::Mutex,
    };

    pub(super) static STATE: Mutex<PosixState> = Mutex::new(PosixState {
        current: None,
        known_idents: Vec::new(),
    });

    pub(super) struct PosixState {
        current: Option<&'static CStr>,
        known_idents: Vec<&'static CStr>,
    }
    impl PosixState {
        pub(super) fn open(&mut self, tag: &str, facility: SyslogFacility) -> IoResult<()> {
            if self.current.is_some_and(|c| c.to_bytes() == tag.as_bytes()) {
                return Ok(());
            }
            let nix_facility = facility
                .to_nix()
                .ok_or_else(|| facility.unsupported_by_syslog_call())?;
            let ident = match self
                .known_idents
                .iter()
                .find(|ident| ident.to_bytes() == tag.as_bytes())
            {
                Some(ident) => *ident,
                None => {
                    let ident: &'static CStr = Box::leak(
                        CString::new(tag)
                            .map_err(|_| crate::util::io_err("syslog tag contains NUL bytes"))?
                            .into_boxed_c_str(),
                    );
                    self.known_idents.push(ident);
                    ident
                }
            };

            #[cfg(target_os = "linux")]
            nix::syslog::openlog(Some(ident), nix::syslog::LogFlags::LOG_PID, nix_facility)?;
            #[cfg(not(target_os = "linux"))]
            {
                use std::{ffi::OsStr, os::unix::ffi::OsStrExt};
                nix::syslog::openlog(
                    Some(OsStr::from_bytes(ident.to_bytes())),
                    nix::syslog::LogFlags::LOG_PID,
                    nix_facility,
                )?;
            }
            self.current = Some(ident);
            Ok(())
        }
    }

    pub(super) fn close() {
        if let Ok(mut state) = STATE.lock() {
            if state.current.take().is_some() {
                nix::syslog::closelog();
            }
        }
    }
}
