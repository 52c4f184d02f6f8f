//! Logger for SQL/ORM layers
//!
//! Statement traces record the affected rows and the elapsed time. The SQL
//! text itself is never logged.

use super::{build_config, AdapterOption};
use crate::core::{context::Context, error::Result, logger::Logger};
use std::fmt;
use std::time::Instant;

/// ORM logger writing through a facade [`Logger`].
///
/// # Example
///
/// ```
/// use rust_log_facade::adapters::{sql, SqlLogger};
/// use rust_log_facade::{Context, Level, Logger, SharedBuffer, with_level, with_output};
/// use std::time::Instant;
///
/// let buffer = SharedBuffer::new();
/// let logger = Logger::new([with_level(Level::Debug), with_output(buffer.clone())]);
/// let db_log = SqlLogger::new([sql::with_logger(logger), sql::with_trace(true)]).unwrap();
///
/// let begin = Instant::now();
/// db_log.trace(&Context::new(), begin, || ("SELECT 1".to_string(), 1), None);
/// assert!(buffer.contents().contains("\"rows\":1"));
/// ```
#[derive(Debug, Clone)]
pub struct SqlLogger {
    logger: Logger,
    trace_enabled: bool,
}

pub use super::{with_global_logger, with_logger, with_trace};

impl SqlLogger {
    /// Fails when no logger was selected with `with_global_logger()` or
    /// `with_logger()`. Tracing is off unless enabled with `with_trace`.
    pub fn new<I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = AdapterOption>,
    {
        let (logger, config) = build_config("sql", options)?;
        Ok(Self {
            logger,
            trace_enabled: config.trace,
        })
    }

    pub fn trace_enabled(&self) -> bool {
        self.trace_enabled
    }

    pub fn info(&self, ctx: &Context, args: fmt::Arguments<'_>) {
        self.logger.with_context(ctx.clone()).info_fmt(args)
    }

    pub fn warn(&self, ctx: &Context, args: fmt::Arguments<'_>) {
        self.logger.with_context(ctx.clone()).warn_fmt(args)
    }

    pub fn error(&self, ctx: &Context, args: fmt::Arguments<'_>) {
        self.logger.with_context(ctx.clone()).error_fmt(args)
    }

    /// Log one executed statement: at debug level, or at error level with
    /// the error attached when `err` is set.
    pub fn trace<F>(
        &self,
        ctx: &Context,
        begin: Instant,
        statement: F,
        err: Option<&(dyn std::error::Error + '_)>,
    ) where
        F: FnOnce() -> (String, i64),
    {
        if !self.trace_enabled {
            return;
        }

        let elapsed = begin.elapsed();
        let (_sql, rows) = statement();
        let entry = self
            .logger
            .with_context(ctx.clone())
            .with_field("rows", rows)
            .with_field("elapsed", elapsed);

        match err {
            Some(err) => entry.with_error(err).error(""),
            None => entry.debug(""),
        }
    }
}
