//! Time-rolling file sink
//!
//! Wall-clock time is cut into fixed-width buckets (`unix_seconds / gap`).
//! The sink keeps one file per bucket, named `<basename><%Y-%m-%d %H:%M:%S>.log`
//! after the moment the bucket's file was opened, and switches files on the
//! first record that falls into a different bucket.

use super::{basename_dir, ROLL_TIME_FORMAT};
use crate::core::{LoggerError, Result, Sink};
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Width of one rolling bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeGap {
    Second,
    Minute,
    Hour,
    Day,
}

impl TimeGap {
    #[must_use]
    pub fn as_secs(&self) -> i64 {
        match self {
            TimeGap::Second => 1,
            TimeGap::Minute => 60,
            TimeGap::Hour => 60 * 60,
            TimeGap::Day => 60 * 60 * 24,
        }
    }

    fn bucket(&self, now: &DateTime<Local>) -> i64 {
        now.timestamp().div_euclid(self.as_secs())
    }
}

struct TimeState {
    writer: BufWriter<File>,
    path: PathBuf,
    bucket: i64,
}

pub struct RollByTimeSink {
    basename: String,
    gap: TimeGap,
    state: Mutex<TimeState>,
}

impl RollByTimeSink {
    /// Create the sink and open the file for the current bucket.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or first file cannot be created
    pub fn new(basename: impl Into<String>, gap: TimeGap) -> Result<Self> {
        let basename = basename.into();
        if let Some(dir) = basename_dir(&basename) {
            fs::create_dir_all(dir).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", dir),
                    e,
                )
            })?;
        }

        let now = Local::now();
        let path = Self::path_for(&basename, &now);
        let writer = Self::open(&path)?;

        Ok(Self {
            basename,
            gap,
            state: Mutex::new(TimeState {
                writer,
                path,
                bucket: gap.bucket(&now),
            }),
        })
    }

    #[must_use]
    pub fn gap(&self) -> TimeGap {
        self.gap
    }

    #[must_use]
    pub fn basename(&self) -> &str {
        &self.basename
    }

    #[must_use]
    pub fn current_path(&self) -> PathBuf {
        self.state.lock().path.clone()
    }

    fn path_for(basename: &str, now: &DateTime<Local>) -> PathBuf {
        PathBuf::from(format!("{}{}.log", basename, now.format(ROLL_TIME_FORMAT)))
    }

    fn open(path: &Path) -> Result<BufWriter<File>> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_rotation(
                    path.display().to_string(),
                    format!("Failed to create new log file: {}", e),
                )
            })?;
        Ok(BufWriter::new(file))
    }
}

impl Sink for RollByTimeSink {
    fn log(&self, data: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        let now = Local::now();
        let bucket = self.gap.bucket(&now);

        if bucket != state.bucket {
            state.writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    state.path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
            let path = Self::path_for(&self.basename, &now);
            state.writer = Self::open(&path)?;
            state.path = path;
            state.bucket = bucket;
        }

        let TimeState { writer, path, .. } = &mut *state;
        writer.write_all(data).map_err(|e| {
            LoggerError::file_sink(
                path.display().to_string(),
                format!("Failed to write log record: {}", e),
            )
        })
    }

    fn flush(&self) -> Result<()> {
        let mut state = self.state.lock();
        let TimeState { writer, path, .. } = &mut *state;
        writer.flush().map_err(|e| {
            LoggerError::file_sink(path.display().to_string(), format!("Failed to flush: {}", e))
        })
    }

    fn name(&self) -> &str {
        "roll_by_time"
    }
}

impl Drop for RollByTimeSink {
    fn drop(&mut self) {
        // Best effort flush - ignore errors during drop
        let _ = self.state.get_mut().writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_gap_widths() {
        assert_eq!(TimeGap::Second.as_secs(), 1);
        assert_eq!(TimeGap::Minute.as_secs(), 60);
        assert_eq!(TimeGap::Hour.as_secs(), 3600);
        assert_eq!(TimeGap::Day.as_secs(), 86400);
    }

    #[test]
    fn test_file_opened_at_construction() {
        let dir = tempdir().unwrap();
        let basename = format!("{}/timed/app-", dir.path().display());
        let sink = RollByTimeSink::new(basename, TimeGap::Hour).unwrap();

        let path = sink.current_path();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("app-"));
        assert!(name.ends_with(".log"));
    }

    #[test]
    fn test_switches_file_on_new_bucket() {
        let dir = tempdir().unwrap();
        let basename = format!("{}/sec-", dir.path().display());
        let sink = RollByTimeSink::new(basename, TimeGap::Second).unwrap();

        sink.log(b"first\n").unwrap();
        let first = sink.current_path();
        thread::sleep(Duration::from_millis(1100));
        sink.log(b"second\n").unwrap();
        sink.flush().unwrap();

        let second = sink.current_path();
        assert_ne!(first, second);
        assert_eq!(fs::read_to_string(&second).unwrap(), "second\n");
        assert!(fs::read_to_string(&first).unwrap().contains("first\n"));
    }
}
