//! Logger for tracer client libraries
//!
//! Tracer clients hand over pre-formatted lines such as
//! `Datadog Tracer v1.2.3 ERROR: lost connection`. The level and message are
//! parsed back out so the record lands at the right level.

use super::{build_config, AdapterOption};
use crate::core::{
    error::{LoggerError, Result},
    logger::Logger,
};
use regex::Regex;

pub use super::{with_global_logger, with_logger};

const MESSAGE_PATTERN: &str = r"^(?P<source>Datadog\sTracer\sv\d+\.\d+\.\d+)\s(?P<level>(?:ERROR)|(?:WARN)|(?:INFO)|(?:DEBUG)):\s(?P<msg>.+)$";

const NO_MATCH: &str = "Datadog logger adapter could not match the log statement to the pattern, falling back to warning";

#[derive(Debug, Clone)]
pub struct TracerLogger {
    logger: Logger,
    pattern: Regex,
}

impl TracerLogger {
    /// Fails when no logger was selected with `with_global_logger()` or
    /// `with_logger()`.
    pub fn new<I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = AdapterOption>,
    {
        let (logger, _) = build_config("tracer", options)?;
        let pattern =
            Regex::new(MESSAGE_PATTERN).map_err(|e| LoggerError::adapter("tracer", e.to_string()))?;
        Ok(Self { logger, pattern })
    }

    pub fn log(&self, msg: &str) {
        let Some(caps) = self.pattern.captures(msg) else {
            self.logger.with_field("log_parse_err", NO_MATCH).warn(msg);
            return;
        };

        let source = caps.name("source").map_or("", |m| m.as_str());
        let level = caps.name("level").map_or("", |m| m.as_str());
        let message = caps.name("msg").map_or("", |m| m.as_str());

        let entry = self.logger.with_field("source", source);
        match level {
            "ERROR" => entry.error(message),
            "WARN" => entry.warn(message),
            "INFO" => entry.info(message),
            "DEBUG" => entry.debug(message),
            other => entry
                .with_field("log_parse_err", "Could not resolve the level")
                .with_field("parsed_level", other)
                .warn(message),
        }
    }
}
