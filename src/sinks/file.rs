//! Append-only file sink

use super::create_parent_dir;
use crate::core::{LoggerError, Result, Sink};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends every record to one file, opened once for the sink's lifetime.
///
/// Missing parent directories are created. The file is never truncated.
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileSink {
    /// Open `path` for appending.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created or opened
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        create_parent_dir(&path)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::file_sink(path.display().to_string(), format!("Failed to open: {}", e))
            })?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn log(&self, data: &[u8]) -> Result<()> {
        self.writer.lock().write_all(data).map_err(|e| {
            LoggerError::file_sink(
                self.path.display().to_string(),
                format!("Failed to write log record: {}", e),
            )
        })
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush().map_err(|e| {
            LoggerError::file_sink(
                self.path.display().to_string(),
                format!("Failed to flush: {}", e),
            )
        })
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Best effort flush - ignore errors during drop
        let _ = self.writer.get_mut().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("nested/deeper/app.log");

        let sink = FileSink::new(&log_path).unwrap();
        sink.log(b"first\n").unwrap();
        sink.flush().unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "first\n");
        assert_eq!(sink.path(), log_path);
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("append.log");

        {
            let sink = FileSink::new(&log_path).unwrap();
            sink.log(b"one\n").unwrap();
        }
        {
            let sink = FileSink::new(&log_path).unwrap();
            sink.log(b"two\n").unwrap();
        }

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "one\ntwo\n");
    }
}
