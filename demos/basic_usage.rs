//! Basic logger usage example
//!
//! Demonstrates the global logger, levels, fields and output formats.
//!
//! Run with: cargo run --example basic_usage

use rust_log_facade::global;
use rust_log_facade::prelude::*;
use rust_log_facade::{fields, info};

fn main() -> Result<()> {
    println!("=== Rust Log Facade - Basic Usage Example ===\n");

    // The global logger starts at warning level and writes JSON to stdout
    println!("1. Default global logger:");
    global::info("Info message (hidden)");
    global::warn("Warning message (visible)");

    // Level from the environment, falling back to warning on bad values
    println!("\n2. Level from LOG_LEVEL (defaults to debug here):");
    if std::env::var_os("LOG_LEVEL").is_none() {
        std::env::set_var("LOG_LEVEL", "debug");
    }
    configure_global([with_level_from_env("LOG_LEVEL")]);
    global::debug("Debug message");

    // Fields are copied into new entries, the base entry is never changed
    println!("\n3. Structured fields:");
    let request = global::with_fields(fields! { "method" => "GET", "path" => "/orders" });
    request.with_field("status", 200).info("Request served");
    request.with_field("status", 503).error("Upstream unavailable");

    let port = 8080;
    info!(global(), "Listening on port {}", port);

    // A dedicated logger with another format
    println!("\n4. Logfmt and text output:");
    let logger = Logger::builder()
        .level(Level::Info)
        .format(OutputFormat::Logfmt)
        .report_caller(false)
        .build();
    logger.with_field("user", "alice").info("Logged in");

    logger.configure([with_format(OutputFormat::Text)]);
    logger.warn("Disk usage above 80%");

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
