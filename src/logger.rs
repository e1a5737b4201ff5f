//! Logging utilities.
//!
//! The emulation logs through the [`log`] facade. This module provides an
//! optional logger keeping the latest records in memory, so they can be
//! inspected without a terminal or a browser console.

use lazy_static::lazy_static;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Saves all log records in a global deque.
pub struct MemoryLogger;

static LOGGER: MemoryLogger = MemoryLogger;

/// A log record.
pub struct Record {
    /// Log level used for this record
    pub level: log::Level,
    /// Time this message was logged
    pub time: time::OffsetDateTime,
    /// Module the message came from
    pub target: String,
    /// Message content
    pub message: String,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = self
            .time
            .format(&time::format_description::well_known::Rfc3339)
            .map_err(|_| fmt::Error)?;
        write!(
            f,
            "{} {:<5} [{}] {}",
            time, self.level, self.target, self.message
        )
    }
}

lazy_static! {
    /// Circular buffer for logs.
    ///
    /// Holds at most as many records as were reserved with
    /// [`reserve_logs`]. Older records are dropped first.
    pub static ref LOGS: Mutex<VecDeque<Record>> =
        Mutex::new(VecDeque::new());
}

fn logs() -> MutexGuard<'static, VecDeque<Record>> {
    LOGS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Log a record in the in-memory queue.
pub fn log(record: &log::Record<'_>) {
    let mut logs = logs();
    if logs.capacity() == 0 {
        return;
    }
    if logs.len() == logs.capacity() {
        logs.pop_front();
    }
    logs.push_back(Record {
        level: record.level(),
        target: record.target().to_string(),
        message: format!("{}", record.args()),
        time: time::OffsetDateTime::now_local()
            .unwrap_or_else(|_| time::OffsetDateTime::now_utc()),
    });
}

impl log::Log for MemoryLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        log(record);
    }

    fn flush(&self) {}
}

/// Initialize the in-memory logger.
///
/// Make sure this is the only logger your are using.
///
/// Fails if another logger was already installed.
pub fn init() -> Result<(), log::SetLoggerError> {
    reserve_logs(1_000);

    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Return a logger that stores records in the in-memory queue.
///
/// An easier alternative might be to use [`init()`].
pub fn get_logger() -> MemoryLogger {
    reserve_logs(1_000);
    MemoryLogger
}

/// Adds `n` more entries to the log queue.
///
/// You should call this if you're not using `init()` nor `get_logger()`.
pub fn reserve_logs(n: usize) {
    logs().reserve(n);
}

/// Removes and returns every record currently in the queue.
pub fn drain_logs() -> Vec<Record> {
    logs().drain(..).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_kept() {
        reserve_logs(16);

        log(&log::Record::builder()
            .args(format_args!("handle moved to {}", 22))
            .level(log::Level::Debug)
            .target("trackpad_scroll::sync")
            .build());

        let records = drain_logs();
        let record = records
            .iter()
            .find(|r| r.message == "handle moved to 22")
            .unwrap();
        assert_eq!(record.level, log::Level::Debug);

        let line = record.to_string();
        assert!(line.contains("DEBUG"));
        assert!(line.ends_with("[trackpad_scroll::sync] handle moved to 22"));
    }
}
