//! Framework adapters
//!
//! Shims that let other logging APIs and frameworks write through a
//! [`Logger`]. They only use the public entry/logger API.

pub mod keyvalue;
pub mod log_bridge;
pub mod migration;
pub mod sql;
pub mod tracer;
pub mod web;

pub use keyvalue::{KeyValueLogger, UNPAIRED_VALUE};
pub use log_bridge::LogBridge;
pub use migration::MigrationLogger;
pub use sql::SqlLogger;
pub use tracer::TracerLogger;
pub use web::{WebLevel, WebLogger};

use crate::core::{
    error::{LoggerError, Result},
    logger::Logger,
};
use std::fmt;

/// Settings shared by adapters that are built from options.
#[derive(Debug, Default)]
pub struct AdapterConfig {
    logger: Option<Logger>,
    trace: bool,
}

/// A single adapter construction step.
pub struct AdapterOption(Box<dyn FnOnce(&mut AdapterConfig) + Send>);

impl fmt::Debug for AdapterOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdapterOption")
    }
}

/// Write through the process-wide logger
pub fn with_global_logger() -> AdapterOption {
    AdapterOption(Box::new(|c| c.logger = Some(crate::global::global().clone())))
}

/// Write through `logger`
pub fn with_logger(logger: Logger) -> AdapterOption {
    AdapterOption(Box::new(move |c| c.logger = Some(logger)))
}

/// Log per-statement traces (SQL adapter only)
pub fn with_trace(enable: bool) -> AdapterOption {
    AdapterOption(Box::new(move |c| c.trace = enable))
}

/// Apply `options` in order; a logger must have been chosen.
fn build_config<I>(adapter: &str, options: I) -> Result<(Logger, AdapterConfig)>
where
    I: IntoIterator<Item = AdapterOption>,
{
    let mut config = AdapterConfig::default();
    for option in options {
        (option.0)(&mut config);
    }
    match config.logger.take() {
        Some(logger) => Ok((logger, config)),
        None => Err(LoggerError::adapter(
            adapter,
            "no logger instance provided, use with_global_logger() or with_logger() to configure the logger",
        )),
    }
}
