//! File logging example
//!
//! Demonstrates writing records to a file and configuring a logger from
//! `LOG_*` environment variables.
//!
//! Run with: cargo run --example file_logging

use rust_log_facade::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Log Facade - File Logging Example ===\n");

    let path = std::env::temp_dir().join("rust_log_facade_demo.log");

    // LOG_LEVEL, LOG_FORMAT, LOG_TIMESTAMP_FORMAT ... override the defaults
    let mut options = LoggerConfig::from_default_env().into_options();
    options.push(with_output(Output::file(&path)?));
    let logger = Logger::new(options);
    logger.set_level(Level::Debug);

    println!("1. Logging to {}:", path.display());
    logger.info("Application started");
    logger.debug("Loading configuration...");
    logger
        .with_field("pool_size", 16)
        .info("Database connection established");

    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "plugin.so not found");
    logger.with_error(&err).error("Failed to load optional plugin");
    logger.flush()?;

    println!("\n2. File contents:");
    for line in std::fs::read_to_string(&path)?.lines() {
        println!("   {}", line);
    }

    let metrics = logger.metrics();
    println!(
        "\n3. Written: {}, suppressed: {}",
        metrics.records_written(),
        metrics.records_suppressed()
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
