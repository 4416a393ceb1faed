//! Main logger implementation
//!
//! A [`Logger`] filters by level, expands the payload, renders the record
//! through its compiled [`Formatter`] and hands the bytes to its sinks,
//! either immediately under a per-logger lock ([`LoggerKind::Sync`]) or
//! through a double-buffered [`AsyncLooper`] ([`LoggerKind::Async`]).

use super::{
    async_mode::AsyncMode,
    buffer::{Buffer, DEFAULT_BUFFER_SIZE},
    error::{LoggerError, Result},
    formatter::{Formatter, DEFAULT_PATTERN},
    log_level::LogLevel,
    log_message::LogMessage,
    looper::AsyncLooper,
    metrics::LoggerMetrics,
    registry::LoggerRegistry,
    sink::{Sink, SinkPtr},
};
use crate::sinks::ConsoleSink;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// How a logger delivers records to its sinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoggerKind {
    /// Write to every sink on the calling thread before returning
    #[default]
    Sync,
    /// Queue the record and let a dedicated worker thread write it
    Async,
}

enum Dispatch {
    Sync(Mutex<()>),
    Async(AsyncLooper),
}

pub struct Logger {
    name: String,
    level: AtomicU8,
    formatter: Arc<Formatter>,
    sinks: Arc<Vec<SinkPtr>>,
    dispatch: Dispatch,
    /// Metrics for observability (dropped count, total logged, etc.)
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Create a builder for a logger called `name`
    ///
    /// # Example
    /// ```
    /// use logsys::prelude::*;
    ///
    /// let logger = Logger::builder("app")
    ///     .level(LogLevel::Info)
    ///     .pattern("[%p] %m%n")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(logger.name(), "app");
    /// ```
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }

    /// Build a logger from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns error for an empty name, a zero buffer capacity, a pattern
    /// that does not compile, or a worker thread that cannot be spawned
    pub fn from_config(config: LoggerConfig) -> Result<Self> {
        config.validate()?;

        let formatter = match (config.formatter, config.pattern) {
            (Some(formatter), _) => formatter,
            (None, Some(pattern)) => Arc::new(Formatter::new(&pattern)?),
            (None, None) => Arc::new(Formatter::new(DEFAULT_PATTERN)?),
        };

        let sinks: Vec<SinkPtr> = if config.sinks.is_empty() {
            vec![Arc::new(ConsoleSink::new())]
        } else {
            config.sinks
        };
        let sinks = Arc::new(sinks);
        let metrics = Arc::new(LoggerMetrics::new());

        let dispatch = match config.kind {
            LoggerKind::Sync => Dispatch::Sync(Mutex::new(())),
            LoggerKind::Async => {
                let worker_sinks = Arc::clone(&sinks);
                let worker_metrics = Arc::clone(&metrics);
                let looper = AsyncLooper::with_capacity(
                    &config.name,
                    config.async_mode,
                    config.buffer_capacity,
                    Arc::clone(&metrics),
                    Box::new(move |batch: &Buffer| {
                        Self::write_to_sinks(&worker_sinks, batch.readable(), &worker_metrics);
                        Self::flush_sinks(&worker_sinks, &worker_metrics);
                    }),
                )?;
                Dispatch::Async(looper)
            }
        };

        Ok(Self {
            name: config.name,
            level: AtomicU8::new(config.level.as_u8()),
            formatter,
            sinks,
            dispatch,
            metrics,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Change the threshold; takes effect for calls that start afterwards.
    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level.as_u8(), Ordering::Relaxed);
    }

    /// Whether a record at `level` would be emitted
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && level.as_u8() >= self.level.load(Ordering::Relaxed)
    }

    pub fn kind(&self) -> LoggerKind {
        match self.dispatch {
            Dispatch::Sync(_) => LoggerKind::Sync,
            Dispatch::Async(_) => LoggerKind::Async,
        }
    }

    /// Backpressure mode, for async loggers
    pub fn async_mode(&self) -> Option<AsyncMode> {
        match &self.dispatch {
            Dispatch::Sync(_) => None,
            Dispatch::Async(looper) => Some(looper.mode()),
        }
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    pub fn sinks(&self) -> &[SinkPtr] {
        &self.sinks
    }

    /// Get the logger metrics for detailed observability
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Emit one record.
    ///
    /// Nothing is formatted when `level` is filtered out. A payload whose
    /// `Display` impls fail is reported on stderr and dropped; the logger
    /// keeps working.
    pub fn log(&self, level: LogLevel, file: &str, line: u32, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }

        let mut payload = String::new();
        if let Err(e) = payload.write_fmt(args) {
            self.metrics.record_format_error();
            self.metrics.record_dropped();
            eprintln!(
                "[LOGGER ERROR] Failed to format message for logger '{}' at {}:{}: {}",
                self.name, file, line, e
            );
            return;
        }

        let msg = LogMessage::new(level, file, line, &self.name, payload);
        let record = self.formatter.format(&msg);
        self.dispatch(record.as_bytes());
    }

    #[inline]
    pub fn debug(&self, file: &str, line: u32, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Debug, file, line, args);
    }

    #[inline]
    pub fn info(&self, file: &str, line: u32, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Info, file, line, args);
    }

    #[inline]
    pub fn warning(&self, file: &str, line: u32, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Warning, file, line, args);
    }

    #[inline]
    pub fn error(&self, file: &str, line: u32, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Error, file, line, args);
    }

    #[inline]
    pub fn fatal(&self, file: &str, line: u32, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Fatal, file, line, args);
    }

    fn dispatch(&self, record: &[u8]) {
        match &self.dispatch {
            Dispatch::Sync(lock) => {
                let _guard = lock.lock();
                Self::write_to_sinks(&self.sinks, record, &self.metrics);
                self.metrics.record_logged();
            }
            Dispatch::Async(looper) => match looper.push(record) {
                Ok(()) => {
                    self.metrics.record_logged();
                }
                Err(e) => {
                    self.metrics.record_dropped();
                    eprintln!("[LOGGER ERROR] Logger '{}' dropped a record: {}", self.name, e);
                }
            },
        }
    }

    /// Write `data` to every sink in order with per-sink panic isolation.
    ///
    /// A failing sink is reported and skipped; the others still receive the
    /// bytes. Nothing is retried.
    fn write_to_sinks(sinks: &[SinkPtr], data: &[u8], metrics: &LoggerMetrics) {
        for (idx, sink) in sinks.iter().enumerate() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.log(data)));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    metrics.record_sink_failure();
                    eprintln!("[LOGGER ERROR] Sink #{} ({}) failed: {}", idx, sink.name(), e);
                }
                Err(panic_info) => {
                    metrics.record_sink_failure();
                    eprintln!(
                        "[LOGGER CRITICAL] Sink #{} ({}) panicked: {}. \
                         Other sinks continue to function.",
                        idx,
                        sink.name(),
                        panic_message(panic_info.as_ref())
                    );
                }
            }
        }
    }

    fn flush_sinks(sinks: &[SinkPtr], metrics: &LoggerMetrics) {
        for (idx, sink) in sinks.iter().enumerate() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.flush()));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    metrics.record_sink_failure();
                    eprintln!("[LOGGER ERROR] Sink #{} ({}) flush failed: {}", idx, sink.name(), e);
                }
                Err(panic_info) => {
                    metrics.record_sink_failure();
                    eprintln!(
                        "[LOGGER CRITICAL] Sink #{} ({}) panicked during flush: {}",
                        idx,
                        sink.name(),
                        panic_message(panic_info.as_ref())
                    );
                }
            }
        }
    }

    /// Flush every sink.
    ///
    /// For an async logger this does not wait for queued records; use
    /// [`Logger::shutdown`] to drain them.
    pub fn flush(&self) -> Result<()> {
        for sink in self.sinks.iter() {
            sink.flush()?;
        }
        Ok(())
    }

    /// Drain the async worker (if any), stop it, and flush every sink.
    ///
    /// Every record accepted before the call reaches the sinks. Records
    /// logged afterwards on an async logger are dropped and counted.
    pub fn shutdown(&mut self) {
        if let Dispatch::Async(looper) = &mut self.dispatch {
            looper.stop();
        }
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("kind", &self.kind())
            .field("pattern", &self.formatter.pattern())
            .field("sinks", &self.sinks.iter().map(|s| s.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown();

        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger '{}' shutting down with {} dropped logs (drop rate: {:.2}%)",
                self.name,
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

fn panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Everything needed to construct a [`Logger`]
///
/// A pre-compiled `formatter` takes precedence over `pattern`. With neither,
/// [`DEFAULT_PATTERN`] is used; with no sinks, a single console sink is used.
#[derive(Clone)]
pub struct LoggerConfig {
    pub name: String,
    pub level: LogLevel,
    pub pattern: Option<String>,
    pub formatter: Option<Arc<Formatter>>,
    pub sinks: Vec<SinkPtr>,
    pub kind: LoggerKind,
    pub async_mode: AsyncMode,
    /// Initial capacity of each dispatcher buffer, in bytes
    pub buffer_capacity: usize,
}

impl LoggerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: LogLevel::Debug,
            pattern: None,
            formatter: None,
            sinks: Vec::new(),
            kind: LoggerKind::Sync,
            async_mode: AsyncMode::Bounded,
            buffer_capacity: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Fail fast on fields that can never produce a usable logger
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(LoggerError::config("LoggerConfig", "logger name must not be empty"));
        }
        if self.kind == LoggerKind::Async && self.buffer_capacity == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "async buffer capacity must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Builder for constructing a Logger with a fluent API
///
/// # Example
/// ```
/// use logsys::prelude::*;
///
/// let registry = LoggerRegistry::new().unwrap();
/// let logger = Logger::builder("worker")
///     .level(LogLevel::Warning)
///     .sink(ConsoleSink::new())
///     .async_mode(AsyncMode::Bounded)
///     .build_into(&registry)
///     .unwrap();
///
/// assert!(registry.get("worker").is_some());
/// assert_eq!(logger.kind(), LoggerKind::Async);
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: LoggerConfig::new(name),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    /// Pattern compiled at build time
    #[must_use = "builder methods return a new value"]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.pattern = Some(pattern.into());
        self
    }

    /// Reuse an already compiled formatter
    #[must_use = "builder methods return a new value"]
    pub fn formatter(mut self, formatter: Arc<Formatter>) -> Self {
        self.config.formatter = Some(formatter);
        self
    }

    /// Add a sink owned by this logger
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.config.sinks.push(Arc::new(sink));
        self
    }

    /// Add a sink that other loggers may also hold
    #[must_use = "builder methods return a new value"]
    pub fn shared_sink(mut self, sink: SinkPtr) -> Self {
        self.config.sinks.push(sink);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn kind(mut self, kind: LoggerKind) -> Self {
        self.config.kind = kind;
        self
    }

    /// Make the logger asynchronous with the given backpressure mode
    #[must_use = "builder methods return a new value"]
    pub fn async_mode(mut self, mode: AsyncMode) -> Self {
        self.config.kind = LoggerKind::Async;
        self.config.async_mode = mode;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn buffer_capacity(mut self, bytes: usize) -> Self {
        self.config.buffer_capacity = bytes;
        self
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Build the Logger
    pub fn build(self) -> Result<Logger> {
        Logger::from_config(self.config)
    }

    /// Build the logger and register it under its name
    pub fn build_into(self, registry: &LoggerRegistry) -> Result<Arc<Logger>> {
        registry.register(self.build()?)
    }
}

impl From<LoggerConfig> for LoggerBuilder {
    fn from(config: LoggerConfig) -> Self {
        Self { config }
    }
}
