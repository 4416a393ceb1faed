//! Log message structure

use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use std::cell::RefCell;

// Thread-local cache so the thread id is rendered once per thread
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Get cached thread ID, computing and caching it on first access
fn get_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

/// A single log record, built once per call and consumed by the formatter.
///
/// The source file and logger name are borrowed from the call site and the
/// logger; only the expanded payload is owned.
#[derive(Debug, Clone)]
pub struct LogMessage<'a> {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub thread_id: String,
    pub file: &'a str,
    pub line: u32,
    pub logger_name: &'a str,
    pub payload: String,
}

impl<'a> LogMessage<'a> {
    pub fn new(
        level: LogLevel,
        file: &'a str,
        line: u32,
        logger_name: &'a str,
        payload: String,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            thread_id: get_thread_id(),
            file,
            line,
            logger_name,
            payload,
        }
    }

    /// Replace the creation time, mostly useful for deterministic rendering
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_id_is_stable_per_thread() {
        let a = LogMessage::new(LogLevel::Info, "a.rs", 1, "root", String::new());
        let b = LogMessage::new(LogLevel::Info, "a.rs", 2, "root", String::new());
        assert_eq!(a.thread_id, b.thread_id);

        let other = std::thread::spawn(|| {
            LogMessage::new(LogLevel::Info, "a.rs", 3, "root", String::new()).thread_id
        })
        .join()
        .unwrap();
        assert_ne!(a.thread_id, other);
    }
}
