//! File logging example
//!
//! Shows a plain file sink, a size-rolling sink and a time-rolling sink
//! attached to one logger.
//!
//! Run with: cargo run --example file_logging

use logsys::prelude::*;
use logsys::{info, warn};
use std::fs;

fn main() -> Result<()> {
    println!("=== logsys - File Logging Example ===\n");

    let dir = std::env::temp_dir().join("logsys_file_demo");
    let _ = fs::remove_dir_all(&dir);
    let base = dir.display().to_string();

    let by_size = RollBySizeSink::new(format!("{}/size/app-", base), 4 * 1024)?;
    #[cfg(feature = "compression")]
    let by_size = by_size.with_compression(true);

    let logger = Logger::builder("files")
        .pattern("%d{%Y-%m-%d %H:%M:%S} [%p] %f:%l %m%n")
        .sink(FileSink::new(dir.join("plain.log"))?)
        .sink(by_size)
        .sink(RollByTimeSink::new(format!("{}/time/app-", base), TimeGap::Minute)?)
        .build()?;

    for i in 0..500 {
        info!(logger, "processing item {}", i);
        if i % 100 == 0 {
            warn!(logger, "checkpoint at item {}", i);
        }
    }
    drop(logger);

    println!("Files written under {}:", dir.display());
    for sub in ["", "size", "time"] {
        let path = dir.join(sub);
        for entry in fs::read_dir(&path)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                println!("   {:>8} bytes  {}", entry.metadata()?.len(), entry.path().display());
            }
        }
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
