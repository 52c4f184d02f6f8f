//! Declarative logger configuration
//!
//! [`LoggerConfig`] can be deserialized from any serde format or read from
//! environment variables, then turned into [`LoggerOption`]s. Invalid values
//! never abort startup: they fall back to the defaults with a notice on
//! stderr.

use super::{
    level::Level,
    options::{
        with_consistent_ordering, with_format, with_level, with_report_caller,
        with_timestamp_format, LoggerOption,
    },
    timestamp::TimestampFormat,
};
use crate::engine::OutputFormat;
use serde::Deserialize;

/// Prefix used by [`LoggerConfig::from_default_env`].
pub const DEFAULT_ENV_PREFIX: &str = "LOG_";

/// Configuration values; unset values keep the logger defaults.
///
/// # Example
///
/// ```
/// use rust_log_facade::{Level, LoggerConfig, OutputFormat};
///
/// let config: LoggerConfig =
///     serde_json::from_str(r#"{"level":"info","format":"logfmt"}"#).unwrap();
/// assert_eq!(config.level, Some(Level::Info));
/// assert_eq!(config.format, Some(OutputFormat::Logfmt));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    pub level: Option<Level>,
    pub report_caller: Option<bool>,
    pub format: Option<OutputFormat>,
    pub timestamp_format: Option<TimestampFormat>,
    pub consistent_ordering: Option<bool>,
}

impl LoggerConfig {
    /// Read `<prefix>LEVEL`, `<prefix>REPORT_CALLER`, `<prefix>FORMAT`,
    /// `<prefix>TIMESTAMP_FORMAT` and `<prefix>CONSISTENT_ORDERING`.
    pub fn from_env(prefix: &str) -> Self {
        Self::from_lookup(prefix, |name| std::env::var(name).ok())
    }

    pub fn from_default_env() -> Self {
        Self::from_env(DEFAULT_ENV_PREFIX)
    }

    fn from_lookup<F>(prefix: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| {
            let name = format!("{}{}", prefix, suffix);
            lookup(&name).map(|value| (name, value))
        };

        let mut config = Self::default();

        if let Some((name, value)) = var("LEVEL") {
            config.level = Some(Level::from_name(&value).unwrap_or_else(|| {
                eprintln!(
                    "[LOGGER WARNING] {}='{}' is not a log level, using {}",
                    name,
                    value,
                    Level::Warn
                );
                Level::Warn
            }));
        }
        if let Some((name, value)) = var("REPORT_CALLER") {
            config.report_caller = parse_bool(&name, &value);
        }
        if let Some((name, value)) = var("FORMAT") {
            config.format = parse_or_warn(&name, &value);
        }
        if let Some((name, value)) = var("TIMESTAMP_FORMAT") {
            config.timestamp_format = parse_or_warn(&name, &value);
        }
        if let Some((name, value)) = var("CONSISTENT_ORDERING") {
            config.consistent_ordering = parse_bool(&name, &value);
        }

        config
    }

    /// Options for the values that are set
    pub fn into_options(self) -> Vec<LoggerOption> {
        let mut options = Vec::new();
        if let Some(level) = self.level {
            options.push(with_level(level));
        }
        if let Some(enable) = self.report_caller {
            options.push(with_report_caller(enable));
        }
        if let Some(format) = self.format {
            options.push(with_format(format));
        }
        if let Some(format) = self.timestamp_format {
            options.push(with_timestamp_format(format));
        }
        if let Some(enable) = self.consistent_ordering {
            options.push(with_consistent_ordering(enable));
        }
        options
    }
}

fn parse_bool(name: &str, value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            eprintln!("[LOGGER WARNING] {}='{}' is not a boolean, ignoring", name, value);
            None
        }
    }
}

fn parse_or_warn<T>(name: &str, value: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            eprintln!("[LOGGER WARNING] {}: {}, ignoring", name, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_empty_environment() {
        let config = LoggerConfig::from_lookup("APP_", lookup(&[]));
        assert_eq!(config, LoggerConfig::default());
        assert!(config.into_options().is_empty());
    }

    #[test]
    fn test_all_variables() {
        let config = LoggerConfig::from_lookup(
            "APP_",
            lookup(&[
                ("APP_LEVEL", "Debug"),
                ("APP_REPORT_CALLER", "false"),
                ("APP_FORMAT", "text"),
                ("APP_TIMESTAMP_FORMAT", "unix"),
                ("APP_CONSISTENT_ORDERING", "1"),
            ]),
        );

        assert_eq!(config.level, Some(Level::Debug));
        assert_eq!(config.report_caller, Some(false));
        assert_eq!(config.format, Some(OutputFormat::Text));
        assert_eq!(config.timestamp_format, Some(TimestampFormat::Unix));
        assert_eq!(config.consistent_ordering, Some(true));
        assert_eq!(config.into_options().len(), 5);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = LoggerConfig::from_lookup(
            "APP_",
            lookup(&[
                ("APP_LEVEL", "loud"),
                ("APP_REPORT_CALLER", "maybe"),
                ("APP_FORMAT", "xml"),
            ]),
        );

        assert_eq!(config.level, Some(Level::Warn));
        assert_eq!(config.report_caller, None);
        assert_eq!(config.format, None);
    }

    #[test]
    fn test_invalid_timestamp_pattern_is_ignored() {
        let config =
            LoggerConfig::from_lookup("APP_", lookup(&[("APP_TIMESTAMP_FORMAT", "%Q")]));
        assert_eq!(config.timestamp_format, None);
        assert!(config.into_options().is_empty());
    }

    #[test]
    fn test_deserialize_warning_alias() {
        let config: LoggerConfig =
            serde_json::from_str(r#"{"level":"warning","report_caller":false}"#).unwrap();
        assert_eq!(config.level, Some(Level::Warn));
        assert_eq!(config.report_caller, Some(false));
    }

    #[test]
    fn test_deserialize_rejects_unknown_keys() {
        let result = serde_json::from_str::<LoggerConfig>(r#"{"colour":"blue"}"#);
        assert!(result.is_err());
    }
}
