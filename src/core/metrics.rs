//! Logger metrics for observability
//!
//! Counters for monitoring logger health: records delivered or dropped,
//! payload formatting failures, sink failures, producer blocking in bounded
//! async mode, and worker flushes.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use logsys::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_dropped();
/// metrics.record_logged();
///
/// assert_eq!(metrics.dropped_count(), 1);
/// assert_eq!(metrics.total_logged(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records that passed the level filter but never reached dispatch
    dropped_count: AtomicU64,

    /// Records handed to the sinks (sync) or queued on the dispatcher (async)
    total_logged: AtomicU64,

    /// Payload expansions that failed
    format_errors: AtomicU64,

    /// Individual sink write or flush failures
    sink_failures: AtomicU64,

    /// Number of times a bounded-mode producer had to wait for space
    block_events: AtomicU64,

    /// Number of swapped buffers delivered by the async worker
    batches_flushed: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            dropped_count: AtomicU64::new(0),
            total_logged: AtomicU64::new(0),
            format_errors: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
            batches_flushed: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn format_errors(&self) -> u64 {
        self.format_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn batches_flushed(&self) -> u64 {
        self.batches_flushed.load(Ordering::Relaxed)
    }

    /// Record a dropped log, returning the previous count
    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_format_error(&self) -> u64 {
        self.format_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_batch(&self) -> u64 {
        self.batches_flushed.fetch_add(1, Ordering::Relaxed)
    }

    /// Get drop rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if no logs have been processed.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.total_logged() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.dropped_count.store(0, Ordering::Relaxed);
        self.total_logged.store(0, Ordering::Relaxed);
        self.format_errors.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
        self.block_events.store(0, Ordering::Relaxed);
        self.batches_flushed.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            dropped_count: AtomicU64::new(self.dropped_count()),
            total_logged: AtomicU64::new(self.total_logged()),
            format_errors: AtomicU64::new(self.format_errors()),
            sink_failures: AtomicU64::new(self.sink_failures()),
            block_events: AtomicU64::new(self.block_events()),
            batches_flushed: AtomicU64::new(self.batches_flushed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.dropped_count(), 0);
        assert_eq!(metrics.total_logged(), 0);
        assert_eq!(metrics.format_errors(), 0);
        assert_eq!(metrics.sink_failures(), 0);
        assert_eq!(metrics.block_events(), 0);
        assert_eq!(metrics.batches_flushed(), 0);
    }

    #[test]
    fn test_metrics_record_dropped() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_dropped(), 0); // Returns previous value
        assert_eq!(metrics.dropped_count(), 1);
        metrics.record_dropped();
        assert_eq!(metrics.dropped_count(), 2);
    }

    #[test]
    fn test_metrics_drop_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.drop_rate(), 0.0);

        for _ in 0..100 {
            metrics.record_logged();
        }
        assert_eq!(metrics.drop_rate(), 0.0);

        // 100 logged, 10 dropped - ~9.09% drop rate
        for _ in 0..10 {
            metrics.record_dropped();
        }
        let rate = metrics.drop_rate();
        assert!(rate > 9.0 && rate < 10.0, "Drop rate was {}", rate);
    }

    #[test]
    fn test_metrics_reset_and_snapshot() {
        let metrics = LoggerMetrics::new();
        metrics.record_logged();
        metrics.record_sink_failure();
        metrics.record_block();

        let snapshot = metrics.clone();
        metrics.reset();

        assert_eq!(metrics.total_logged(), 0);
        assert_eq!(metrics.sink_failures(), 0);
        assert_eq!(snapshot.total_logged(), 1);
        assert_eq!(snapshot.block_events(), 1);
    }
}
