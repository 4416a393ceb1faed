//! Size-rolling file sink
//!
//! Each file is named `<basename><%Y-%m-%d %H:%M:%S>-<counter>.log`. The
//! counter keeps names unique when several rotations happen within the same
//! second. A new file is opened on the first write and whenever the next
//! record would push the current file past the configured maximum.

use super::{basename_dir, ROLL_TIME_FORMAT};
use crate::core::{LoggerError, Result, Sink};
use chrono::Local;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

struct RollState {
    writer: Option<BufWriter<File>>,
    current_path: Option<PathBuf>,
    current_size: u64,
    counter: u64,
}

/// Rolling file sink with a per-file size cap
///
/// # Examples
///
/// ```no_run
/// use logsys::sinks::RollBySizeSink;
///
/// // Roll to a new file every 1 MiB under ./logdir
/// let sink = RollBySizeSink::new("./logdir/roll-", 1024 * 1024).unwrap();
/// ```
pub struct RollBySizeSink {
    basename: String,
    max_size: u64,
    compress: bool,
    state: Mutex<RollState>,
}

impl RollBySizeSink {
    /// Create a sink rolling at `max_size` bytes.
    ///
    /// No file is opened until the first record arrives.
    ///
    /// # Errors
    ///
    /// Returns error if `max_size` is zero or the directory cannot be created
    pub fn new(basename: impl Into<String>, max_size: u64) -> Result<Self> {
        let basename = basename.into();
        if max_size == 0 {
            return Err(LoggerError::config(
                "RollBySizeSink",
                "max_size must be greater than zero",
            ));
        }

        if let Some(dir) = basename_dir(&basename) {
            fs::create_dir_all(dir).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", dir),
                    e,
                )
            })?;
        }

        Ok(Self {
            basename,
            max_size,
            compress: false,
            state: Mutex::new(RollState {
                writer: None,
                current_path: None,
                current_size: 0,
                counter: 0,
            }),
        })
    }

    /// Gzip every file once it has been rolled away from
    #[cfg(feature = "compression")]
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    #[must_use]
    pub fn basename(&self) -> &str {
        &self.basename
    }

    #[must_use]
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Bytes written to the file currently open
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.state.lock().current_size
    }

    /// Path of the file currently open, if any record was written yet
    #[must_use]
    pub fn current_path(&self) -> Option<PathBuf> {
        self.state.lock().current_path.clone()
    }

    /// Number of files opened so far
    #[must_use]
    pub fn files_opened(&self) -> u64 {
        self.state.lock().counter
    }

    fn needs_roll(&self, state: &RollState, incoming: u64) -> bool {
        state.writer.is_none()
            || state.current_size >= self.max_size
            || (state.current_size > 0 && state.current_size + incoming > self.max_size)
    }

    fn next_path(&self, counter: u64) -> PathBuf {
        PathBuf::from(format!(
            "{}{}-{}.log",
            self.basename,
            Local::now().format(ROLL_TIME_FORMAT),
            counter
        ))
    }

    fn roll(&self, state: &mut RollState) -> Result<()> {
        if let Some(mut writer) = state.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.basename.clone(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
            // Writer is dropped here, releasing the file handle
        }

        if self.compress {
            if let Some(previous) = state.current_path.take() {
                if let Err(e) = compress_file(&previous) {
                    eprintln!(
                        "[LOGGER WARNING] Failed to compress rolled file {}: {}",
                        previous.display(),
                        e
                    );
                }
            }
        }

        let path = self.next_path(state.counter);
        state.counter += 1;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::file_rotation(
                    path.display().to_string(),
                    format!("Failed to create new log file: {}", e),
                )
            })?;

        state.writer = Some(BufWriter::new(file));
        state.current_path = Some(path);
        state.current_size = 0;
        Ok(())
    }
}

impl Sink for RollBySizeSink {
    fn log(&self, data: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        let incoming = data.len() as u64;

        if self.needs_roll(&state, incoming) {
            self.roll(&mut state)?;
        }

        let RollState {
            writer,
            current_path,
            current_size,
            ..
        } = &mut *state;
        let writer = writer
            .as_mut()
            .ok_or_else(|| LoggerError::file_sink(self.basename.clone(), "Writer not initialized"))?;

        writer.write_all(data).map_err(|e| {
            let path = current_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| self.basename.clone());
            LoggerError::file_sink(path, format!("Failed to write log record: {}", e))
        })?;
        *current_size += incoming;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        if let Some(ref mut writer) = self.state.lock().writer {
            writer.flush().map_err(|e| {
                LoggerError::file_sink(self.basename.clone(), format!("Failed to flush: {}", e))
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "roll_by_size"
    }
}

impl Drop for RollBySizeSink {
    fn drop(&mut self) {
        if let Some(mut writer) = self.state.get_mut().writer.take() {
            // Best effort flush - ignore errors during drop
            let _ = writer.flush();
        }
    }
}

/// Gzip `path` next to itself as `<path>.gz`, removing the original only
/// once the compressed copy is complete.
#[cfg(feature = "compression")]
fn compress_file(path: &Path) -> Result<()> {
    use std::io::BufReader;

    let mut gz_path = path.as_os_str().to_owned();
    gz_path.push(".gz");
    let gz_path = PathBuf::from(gz_path);
    let mut temp_path = gz_path.as_os_str().to_owned();
    temp_path.push(".tmp");
    let temp_path = PathBuf::from(temp_path);

    let input = File::open(path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to open file for compression: {}", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(64 * 1024, input);

    let output = File::create(&temp_path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to create temporary compressed file: {}", temp_path.display()),
            e,
        )
    })?;
    let mut encoder = flate2::write::GzEncoder::new(
        BufWriter::with_capacity(64 * 1024, output),
        flate2::Compression::default(),
    );

    let streamed = std::io::copy(&mut reader, &mut encoder)
        .and_then(|_| encoder.finish())
        .and_then(|mut inner| inner.flush());
    if let Err(e) = streamed {
        let _ = fs::remove_file(&temp_path);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    fs::rename(&temp_path, &gz_path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to rename compressed file to: {}", gz_path.display()),
            e,
        )
    })?;

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[LOGGER WARNING] Compression succeeded but failed to remove original file {}: {}",
            path.display(),
            e
        );
    }
    Ok(())
}

#[cfg(not(feature = "compression"))]
fn compress_file(_path: &Path) -> Result<()> {
    Ok(())
}
