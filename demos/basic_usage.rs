//! Basic logger usage example
//!
//! Demonstrates a synchronous console logger, the root logger, and level
//! filtering.
//!
//! Run with: cargo run --example basic_usage

use logsys::prelude::*;
use logsys::{debug, error, fatal, info, warn};

fn main() -> Result<()> {
    println!("=== logsys - Basic Usage Example ===\n");

    let registry = LoggerRegistry::new()?;

    // The root logger exists as soon as the registry does
    println!("1. Root logger with the default pattern:");
    info!(registry.root(), "registry created");

    // A console logger with a compact layout
    let logger = Logger::builder("basic")
        .pattern("%d{%H:%M:%S} [%p] %c: %m%n")
        .sink(ConsoleSink::new())
        .build_into(&registry)?;

    println!("\n2. Logging at different levels:");
    debug!(logger, "This is a debug message");
    info!(logger, "This is an info message");
    warn!(logger, "This is a warning message");
    error!(logger, "This is an error message");
    fatal!(logger, "This is a fatal message");

    println!("\n3. Logging with a higher threshold:");
    logger.set_level(LogLevel::Warning);
    println!("   Level set to WARNING - debug and info won't show:");
    debug!(logger, "Debug message (hidden)");
    info!(logger, "Info message (hidden)");
    warn!(logger, "Warning message (visible)");

    println!("\n4. Registered loggers: {:?}", registry.names());
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
