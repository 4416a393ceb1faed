//! Sink implementations

pub mod console;
pub mod file;
pub mod roll_by_size;
pub mod roll_by_time;

pub use console::ConsoleSink;
pub use file::FileSink;
pub use roll_by_size::RollBySizeSink;
pub use roll_by_time::{RollByTimeSink, TimeGap};

pub use crate::core::{Sink, SinkPtr};

use crate::core::{LoggerError, Result};
use std::fs;
use std::path::Path;

/// Timestamp layout embedded in rolled file names
pub(crate) const ROLL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Create the directory that will hold `path`, if it has one.
pub(crate) fn create_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })
        }
        _ => Ok(()),
    }
}

/// Directory part of a rolling-file basename such as `logs/app-`.
///
/// A basename ending in a separator is itself the directory.
pub(crate) fn basename_dir(basename: &str) -> Option<&str> {
    basename
        .rfind(['/', '\\'])
        .map(|pos| &basename[..=pos])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename_dir() {
        assert_eq!(basename_dir("./logdir/roll-"), Some("./logdir/"));
        assert_eq!(basename_dir("logdir/"), Some("logdir/"));
        assert_eq!(basename_dir("roll-"), None);
    }
}
