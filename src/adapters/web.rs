//! Logger for web framework middleware
//!
//! Covers the usual middleware logger surface: a prefix, a coarse level
//! enum, and `print`/`debug`/`info`/`warn`/`error`/`fatal`/`panic` in plain,
//! formatted (`*_fmt`) and JSON object (`*_json`) forms. Panic forms log at
//! fatal level and terminate like any other fatal record.

use crate::core::{
    level::Level,
    logger::Logger,
    options::{with_level, with_output},
    output::Output,
};
use serde::Serialize;
use std::fmt;

/// Level set understood by web middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WebLevel {
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl From<Level> for WebLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Debug => WebLevel::Debug,
            Level::Info => WebLevel::Info,
            Level::Warn => WebLevel::Warn,
            Level::Error | Level::Fatal => WebLevel::Error,
        }
    }
}

impl WebLevel {
    /// `None` for [`WebLevel::Off`]; records cannot be switched off.
    pub fn to_level(self) -> Option<Level> {
        match self {
            WebLevel::Debug => Some(Level::Debug),
            WebLevel::Info => Some(Level::Info),
            WebLevel::Warn => Some(Level::Warn),
            WebLevel::Error => Some(Level::Error),
            WebLevel::Off => None,
        }
    }
}

pub const DEFAULT_PREFIX: &str = "echo";

#[derive(Debug, Clone)]
pub struct WebLogger {
    logger: Logger,
    prefix: String,
}

impl Default for WebLogger {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! leveled {
    ($($plain:ident, $fmt:ident, $json:ident => $level:ident;)+) => {
        $(
            pub fn $plain(&self, msg: impl fmt::Display) {
                self.logger.log(Level::$level, msg)
            }

            pub fn $fmt(&self, args: fmt::Arguments<'_>) {
                self.logger.log_fmt(Level::$level, args)
            }

            pub fn $json<T: Serialize + ?Sized>(&self, value: &T) {
                let msg = self.json_to_string(value);
                self.logger.log(Level::$level, msg)
            }
        )+
    };
}

impl WebLogger {
    /// A dedicated logger at info level.
    pub fn new() -> Self {
        Self::with_logger(Logger::new([with_level(Level::Info)]))
    }

    pub fn with_logger(logger: Logger) -> Self {
        Self {
            logger,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn output(&self) -> Output {
        self.logger.output_handler()
    }

    pub fn set_output(&self, output: impl Into<Output>) {
        self.logger.configure([with_output(output)]);
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    pub fn level(&self) -> WebLevel {
        WebLevel::from(self.logger.level())
    }

    /// Applies to this logger and to the global logger. `Off` is ignored.
    pub fn set_level(&self, level: WebLevel) {
        let Some(level) = level.to_level() else {
            return;
        };
        self.logger.set_level(level);
        crate::global::set_level(level);
    }

    leveled! {
        print, print_fmt, print_json => Info;
        debug, debug_fmt, debug_json => Debug;
        info, info_fmt, info_json => Info;
        warn, warn_fmt, warn_json => Warn;
        error, error_fmt, error_json => Error;
        fatal, fatal_fmt, fatal_json => Fatal;
        panic, panic_fmt, panic_json => Fatal;
    }

    fn json_to_string<T: Serialize + ?Sized>(&self, value: &T) -> String {
        match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                self.logger.error_fmt(format_args!(
                    "unable to marshal json data for logs, marshal error: {}",
                    e
                ));
                String::new()
            }
        }
    }
}
