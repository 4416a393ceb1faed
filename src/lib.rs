//! # logsys
//!
//! An embeddable logging engine: compiled output patterns, pluggable sinks
//! and synchronous or double-buffered asynchronous delivery.
//!
//! ## Features
//!
//! - **Patterns**: `%d{%H:%M:%S} [%p] %c %f:%l %m%n` style layouts compiled once
//! - **Sinks**: console, plain file, size-rolling and time-rolling files
//! - **Async delivery**: one worker per logger, bounded or unbounded backlog
//! - **Thread Safe**: records from concurrent callers never interleave
//!
//! ## Example
//!
//! ```
//! use logsys::prelude::*;
//! use logsys::{info, warn};
//!
//! let registry = LoggerRegistry::new().unwrap();
//! let logger = Logger::builder("app")
//!     .level(LogLevel::Info)
//!     .pattern("%d{%H:%M:%S} [%p] %m%n")
//!     .build_into(&registry)
//!     .unwrap();
//!
//! info!(logger, "listening on port {}", 8080);
//! warn!(registry.root(), "root logger is always available");
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        AsyncMode, Formatter, LogLevel, LogMessage, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, LoggerKind, LoggerMetrics, LoggerRegistry, Result, Sink, SinkPtr,
    };
    pub use crate::sinks::{ConsoleSink, FileSink, RollBySizeSink, RollByTimeSink, TimeGap};
}

pub use core::{
    AsyncLooper, AsyncMode, Buffer, FormatItem, Formatter, LogLevel, LogMessage, Logger,
    LoggerBuilder, LoggerConfig, LoggerError, LoggerKind, LoggerMetrics, LoggerRegistry,
    LooperState, Result, Sink, SinkPtr, DEFAULT_PATTERN, ROOT_LOGGER_NAME,
};
pub use sinks::{ConsoleSink, FileSink, RollBySizeSink, RollByTimeSink, TimeGap};
