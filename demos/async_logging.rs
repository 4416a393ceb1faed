//! Asynchronous logging example
//!
//! Several threads log through one async logger; the worker thread writes
//! swapped batches to a file while producers keep going.
//!
//! Run with: cargo run --example async_logging

use logsys::info;
use logsys::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

fn main() -> Result<()> {
    println!("=== logsys - Async Logging Example ===\n");

    let path = std::env::temp_dir().join("logsys_async_demo.log");
    let _ = std::fs::remove_file(&path);

    for mode in [AsyncMode::Bounded, AsyncMode::Unbounded] {
        let logger = Arc::new(
            Logger::builder(format!("async-{}", mode))
                .pattern("%d{%H:%M:%S}%T%t%T[%p]%T%m%n")
                .async_mode(mode)
                .sink(FileSink::new(&path)?)
                .build()?,
        );

        let start = Instant::now();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let logger = Arc::clone(&logger);
                thread::spawn(move || {
                    for i in 0..25_000 {
                        info!(logger, "worker {} message {}", t, i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker panicked");
        }
        let enqueued = start.elapsed();

        let metrics = logger.metrics().clone();
        drop(logger);
        let drained = start.elapsed();

        println!("{} mode:", mode);
        println!("   enqueued 100000 records in {:?}", enqueued);
        println!("   drained to disk after {:?}", drained);
        println!(
            "   batches: {}, producer waits: {}, dropped: {}",
            metrics.batches_flushed(),
            metrics.block_events(),
            metrics.dropped_count()
        );
    }

    println!("\nOutput written to {}", path.display());
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
