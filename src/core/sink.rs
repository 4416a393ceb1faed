//! Sink trait for log output destinations

use super::error::Result;
use std::sync::Arc;

/// A destination that accepts already-formatted record bytes.
///
/// Sinks take `&self` and guard their own handle, so one sink can be shared
/// by several loggers (and by a sync logger plus an async worker) without
/// interleaving partial writes.
pub trait Sink: Send + Sync {
    /// Write `data` in full or report why it could not be written
    fn log(&self, data: &[u8]) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}

/// Shared handle to a sink; lifetime is that of the longest holder
pub type SinkPtr = Arc<dyn Sink>;
