//! Backpressure modes for the asynchronous dispatcher
//!
//! Decides what a producer does when the dispatcher's producer buffer is
//! already holding unflushed records and the new record does not fit.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Policy for a full producer buffer
///
/// # Example
///
/// ```
/// use logsys::AsyncMode;
///
/// // Default behavior: block producers until the worker swaps buffers
/// assert_eq!(AsyncMode::default(), AsyncMode::Bounded);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsyncMode {
    /// Block the producer until the worker has swapped buffers and enough
    /// space is free.
    ///
    /// The buffer only grows when a single record is larger than the whole
    /// (empty) buffer.
    Bounded,

    /// Never block; the producer buffer grows without limit.
    ///
    /// Warning: memory is unbounded when sinks are slower than producers.
    /// Meant for throughput measurements, not sustained production load.
    Unbounded,
}

impl Default for AsyncMode {
    fn default() -> Self {
        AsyncMode::Bounded
    }
}

impl fmt::Display for AsyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsyncMode::Bounded => write!(f, "Bounded"),
            AsyncMode::Unbounded => write!(f, "Unbounded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_async_mode_display() {
        assert_eq!(AsyncMode::Bounded.to_string(), "Bounded");
        assert_eq!(AsyncMode::Unbounded.to_string(), "Unbounded");
    }
}
