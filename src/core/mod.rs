//! Core logger types and traits

pub mod async_mode;
pub mod buffer;
pub mod error;
pub mod formatter;
pub mod log_level;
pub mod log_message;
pub mod logger;
pub mod looper;
pub mod metrics;
pub mod registry;
pub mod sink;

pub use async_mode::AsyncMode;
pub use buffer::{Buffer, BUFFER_INCREMENT_SIZE, BUFFER_THRESHOLD_SIZE, DEFAULT_BUFFER_SIZE};
pub use error::{LoggerError, Result};
pub use formatter::{FormatItem, Formatter, DEFAULT_PATTERN, DEFAULT_TIME_FORMAT};
pub use log_level::LogLevel;
pub use log_message::LogMessage;
pub use logger::{Logger, LoggerBuilder, LoggerConfig, LoggerKind};
pub use looper::{AsyncLooper, FlushCallback, LooperState};
pub use metrics::LoggerMetrics;
pub use registry::{LoggerRegistry, ROOT_LOGGER_NAME};
pub use sink::{Sink, SinkPtr};
