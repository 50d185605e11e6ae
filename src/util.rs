use crate::{deferred_now::DeferredNow, formats::Pattern, record::Record};
use std::{cell::RefCell, io::Write};

#[derive(Copy, Clone, Debug)]
pub(crate) enum ErrorCode {
    Write,
    Flush,
    Format,
    Poison,
}
impl ErrorCode {
    fn as_index(self) -> &'static str {
        match self {
            Self::Write => "write",
            Self::Flush => "flush",
            Self::Format => "format",
            Self::Poison => "poison",
        }
    }
}

const ERROR_INFO_URL: &str =
    "https://docs.rs/krakend_logging/latest/krakend_logging/error_info/index.html";

pub(crate) fn eprint_err(error_code: ErrorCode, msg: &str, err: &dyn std::error::Error) {
    eprintln!(
        "[krakend_logging][ERRCODE::{code:?}] {msg}, caused by {err:?}\n    \
         See {ERROR_INFO_URL}#{code_lc}",
        code = error_code,
        code_lc = error_code.as_index(),
    );
}

pub(crate) fn io_err(s: &'static str) -> std::io::Error {
    std::io::Error::other(s)
}

// Thread-local buffer
fn buffer_with<F>(f: F)
where
    F: FnOnce(&RefCell<Vec<u8>>),
{
    thread_local! {
        static BUFFER: RefCell<Vec<u8>> = RefCell::new(Vec::with_capacity(200));
    }
    BUFFER.with(f);
}

// Render prefix + pattern + newline into the thread-local buffer, then hand it
// to the writer in a single write_all, so that a line is never split.
pub(crate) fn write_buffered(
    prefix: &str,
    pattern: &Pattern,
    now: &mut DeferredNow,
    record: &Record,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    let mut result: std::io::Result<()> = Ok(());

    buffer_with(|tl_buf| match tl_buf.try_borrow_mut() {
        Ok(mut buffer) => {
            result = render_and_write(prefix, pattern, now, record, &mut buffer, w);
            buffer.clear();
        }
        Err(_e) => {
            // recursive logging, e.g. from a Display impl of a logged value
            let mut tmp_buf = Vec::<u8>::with_capacity(200);
            result = render_and_write(prefix, pattern, now, record, &mut tmp_buf, w);
        }
    });
    result
}

fn render_and_write(
    prefix: &str,
    pattern: &Pattern,
    now: &mut DeferredNow,
    record: &Record,
    buffer: &mut Vec<u8>,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    buffer.extend_from_slice(prefix.as_bytes());
    pattern
        .render(buffer, now, record)
        .unwrap_or_else(|e| eprint_err(ErrorCode::Format, "formatting failed", &e));
    buffer.push(b'\n');
    w.write_all(buffer)
}
