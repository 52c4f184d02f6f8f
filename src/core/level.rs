//! Log level definitions

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a record.
///
/// Ordered from most to least severe: `Fatal < Error < Warn < Info < Debug`.
/// A logger configured at level `L` emits a record at level `V` iff `V <= L`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Predictable errors that make the service unusable. Logging at this
    /// level terminates the process once the record is written.
    Fatal = 0,
    /// Recoverable errors that limit functionality, e.g. timeouts.
    Error = 1,
    /// Non-critical problems that may need attention.
    #[default]
    #[serde(alias = "warning")]
    Warn = 2,
    /// Successful interactions worth monitoring.
    Info = 3,
    /// Development and test diagnostics.
    Debug = 4,
}

/// Accepted configuration names, lower-case.
pub const LEVEL_NAMES: [(&str, Level); 6] = [
    ("fatal", Level::Fatal),
    ("error", Level::Error),
    ("warn", Level::Warn),
    ("warning", Level::Warn),
    ("info", Level::Info),
    ("debug", Level::Debug),
];

impl Level {
    /// All levels, most severe first.
    pub const ALL: [Level; 5] = [
        Level::Fatal,
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
    ];

    /// Name rendered in the `level` key of every record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Fatal => "fatal",
            Level::Error => "error",
            Level::Warn => "warning",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }

    /// Look up a level by name, ignoring case.
    ///
    /// Returns `None` for unknown names; callers decide on the fallback.
    pub fn from_name(name: &str) -> Option<Level> {
        let name = name.trim();
        LEVEL_NAMES
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, level)| *level)
    }

    /// Map a raw ordinal back to a level.
    ///
    /// Out-of-range values map to [`Level::Debug`], the most verbose level.
    pub fn from_ordinal(ordinal: u8) -> Level {
        match ordinal {
            0 => Level::Fatal,
            1 => Level::Error,
            2 => Level::Warn,
            3 => Level::Info,
            _ => Level::Debug,
        }
    }

    /// Whether a logger configured at `self` lets a record at `level` through.
    #[inline]
    pub fn enables(&self, level: Level) -> bool {
        level <= *self
    }

    /// Closest `log` crate level. `log` has no fatal level, so fatal maps to error.
    pub fn to_log_level(&self) -> log::Level {
        match self {
            Level::Fatal | Level::Error => log::Level::Error,
            Level::Warn => log::Level::Warn,
            Level::Info => log::Level::Info,
            Level::Debug => log::Level::Debug,
        }
    }

    /// Filter for the `log` crate that passes exactly what this level passes.
    pub fn to_log_filter(&self) -> log::LevelFilter {
        self.to_log_level().to_level_filter()
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Level::Debug => Blue,
            Level::Info => Green,
            Level::Warn => Yellow,
            Level::Error => Red,
            Level::Fatal => BrightRed,
        }
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug | log::Level::Trace => Level::Debug,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::from_name(s).ok_or_else(|| LoggerError::invalid_level(s))
    }
}
