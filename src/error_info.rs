//! Error codes of `krakend_logging`.
//!
//! Logging itself never returns errors to the caller; problems that occur while a
//! log line is produced are reported on stderr, with one of the following error codes.
//!
//! ## `Write`
//!
//! Writing the log line to one of the sinks failed.
//!
//! Example:
//!
//! ```text
//! [krakend_logging][ERRCODE::Write] writing log line failed, caused by Kind(BrokenPipe)
//! ```
//!
//! The other sinks still get the line.
//! Possible reasons depend on the sink: a closed pipe, a full disk,
//! or, for the syslog, a syslog daemon that went away.
//!
//! ## `Flush`
//!
//! Flushing one of the sinks failed, either explicitly (`Logger::flush`, `fatal`)
//! or when a backend set is replaced by a newer one and gets dropped.
//!
//! ## `Format`
//!
//! Rendering the line pattern failed, e.g. because a value's `Display` implementation
//! returned an error. The line is written with what was rendered until then.
//!
//! ## `Poison`
//!
//! Log entries can be written by all threads of your program. The backends thus keep their
//! mutable parts in `Mutex`es and `RwLock`s. In case that a thread panics
//! while owning one of these locks, the lock is subsequently considered "poisoned".
//!
//! Most likely the root cause for this is some panic! in a `Display` implementation
//! of a logged value.
