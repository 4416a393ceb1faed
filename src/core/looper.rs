//! Double-buffered asynchronous dispatcher
//!
//! Producers append formatted records to the producer [`Buffer`] under a
//! mutex. One dedicated worker thread waits for data, swaps the producer
//! buffer with its private consumer buffer while holding the lock, releases
//! the lock, and hands the consumer buffer to the flush callback. Sink I/O
//! therefore never happens while producers are locked out.
//!
//! Shutdown is cooperative: [`AsyncLooper::stop`] moves the looper to
//! `Draining` and wakes the worker, which keeps swapping until the producer
//! buffer is empty and only then exits.

use super::{
    async_mode::AsyncMode,
    buffer::{Buffer, DEFAULT_BUFFER_SIZE},
    error::{LoggerError, Result},
    metrics::LoggerMetrics,
};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread;

/// Called on the worker thread with each swapped-out batch of records
pub type FlushCallback = Box<dyn FnMut(&Buffer) + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LooperState {
    Running,
    Draining,
    Stopped,
}

struct Queue {
    producer: Buffer,
    state: LooperState,
}

struct Shared {
    queue: Mutex<Queue>,
    /// Signalled after every swap so blocked producers re-check for space
    producer_cv: Condvar,
    /// Signalled on new data or shutdown
    consumer_cv: Condvar,
    metrics: Arc<LoggerMetrics>,
}

pub struct AsyncLooper {
    shared: Arc<Shared>,
    mode: AsyncMode,
    handle: Option<thread::JoinHandle<()>>,
}

impl AsyncLooper {
    /// Start a dispatcher with the default 1 MiB buffers.
    pub fn new(name: &str, mode: AsyncMode, callback: FlushCallback) -> Result<Self> {
        Self::with_capacity(
            name,
            mode,
            DEFAULT_BUFFER_SIZE,
            Arc::new(LoggerMetrics::new()),
            callback,
        )
    }

    /// Start a dispatcher whose producer and consumer buffers both begin at
    /// `capacity` bytes.
    pub fn with_capacity(
        name: &str,
        mode: AsyncMode,
        capacity: usize,
        metrics: Arc<LoggerMetrics>,
        callback: FlushCallback,
    ) -> Result<Self> {
        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue {
                producer: Buffer::with_capacity(capacity),
                state: LooperState::Running,
            }),
            producer_cv: Condvar::new(),
            consumer_cv: Condvar::new(),
            metrics,
        });

        let worker_shared = Arc::clone(&shared);
        let consumer = Buffer::with_capacity(capacity);
        let handle = thread::Builder::new()
            .name(format!("logsys-{}", name))
            .spawn(move || Self::run(worker_shared, consumer, callback))
            .map_err(|e| {
                LoggerError::io_operation(
                    "spawning async worker",
                    format!("Failed to start worker for logger '{}'", name),
                    e,
                )
            })?;

        Ok(Self {
            shared,
            mode,
            handle: Some(handle),
        })
    }

    /// Copy `data` into the producer buffer and wake the worker.
    ///
    /// Returns once the bytes are queued, not once they reach a sink. In
    /// [`AsyncMode::Bounded`] this blocks while the record does not fit into
    /// the unflushed backlog.
    pub fn push(&self, data: &[u8]) -> Result<()> {
        let mut queue = self.shared.queue.lock();
        if queue.state != LooperState::Running {
            return Err(LoggerError::LoggerStopped);
        }

        if self.mode == AsyncMode::Bounded && !Self::fits(&queue.producer, data.len()) {
            self.shared.metrics.record_block();
            while queue.state == LooperState::Running && !Self::fits(&queue.producer, data.len())
            {
                self.shared.producer_cv.wait(&mut queue);
            }
            if queue.state != LooperState::Running {
                return Err(LoggerError::LoggerStopped);
            }
        }

        queue.producer.write(data);
        self.shared.consumer_cv.notify_one();
        Ok(())
    }

    // An empty buffer always accepts, growing once for an oversized record
    fn fits(producer: &Buffer, len: usize) -> bool {
        len <= producer.writable_size() || producer.is_empty()
    }

    pub fn mode(&self) -> AsyncMode {
        self.mode
    }

    pub fn state(&self) -> LooperState {
        self.shared.queue.lock().state
    }

    /// Bytes queued but not yet swapped to the worker
    pub fn pending_bytes(&self) -> usize {
        self.shared.queue.lock().producer.readable_size()
    }

    /// Signal shutdown and wait for the worker to drain every queued byte.
    pub fn stop(&mut self) {
        {
            let mut queue = self.shared.queue.lock();
            if queue.state == LooperState::Running {
                queue.state = LooperState::Draining;
            }
        }
        self.shared.consumer_cv.notify_all();
        self.shared.producer_cv.notify_all();

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.join() {
                eprintln!(
                    "[LOGGER ERROR] Async worker thread panicked during shutdown: {:?}",
                    e
                );
                self.shared.queue.lock().state = LooperState::Stopped;
            }
        }
    }

    fn run(shared: Arc<Shared>, mut consumer: Buffer, mut callback: FlushCallback) {
        loop {
            {
                let mut queue = shared.queue.lock();
                while queue.state == LooperState::Running && queue.producer.is_empty() {
                    shared.consumer_cv.wait(&mut queue);
                }
                if queue.producer.is_empty() {
                    queue.state = LooperState::Stopped;
                    break;
                }
                consumer.swap(&mut queue.producer);
            }
            shared.producer_cv.notify_all();

            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                callback(&consumer)
            }));
            if let Err(panic_info) = result {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!(
                    "[LOGGER CRITICAL] Flush callback panicked: {}. {} bytes lost, worker continues.",
                    panic_msg,
                    consumer.readable_size()
                );
            }
            shared.metrics.record_batch();
            consumer.reset();
        }

        // Release any producer still waiting for space
        shared.producer_cv.notify_all();
    }
}

impl Drop for AsyncLooper {
    fn drop(&mut self) {
        self.stop();
    }
}
