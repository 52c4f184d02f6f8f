//! Logger configuration options
//!
//! A logger is configured by applying a sequence of [`LoggerOption`]s in
//! order; a later option overrides an earlier one for the same setting.
//! Hooks accumulate in the order they are added.

use super::{
    error::HookError,
    fields::{FieldValue, Fields},
    hooks::{Hook, HookEntry},
    level::Level,
    logger::{Logger, Settings},
    output::Output,
    timestamp::TimestampFormat,
};
use crate::engine::{Engine, OutputFormat};
use chrono::{DateTime, FixedOffset};
use std::fmt;
use std::sync::Arc;

/// Called with exit code 1 after a fatal record has been written.
pub type ExitFn = Arc<dyn Fn(i32) + Send + Sync>;

pub(crate) fn default_exit_fn() -> ExitFn {
    Arc::new(|code: i32| std::process::exit(code))
}

/// Message the logger emits about its own configuration once the new
/// configuration is in place.
#[derive(Debug, Clone)]
pub(crate) struct Notice {
    pub message: String,
    pub fields: Fields,
}

/// Configuration under construction while options are applied.
pub struct Config {
    pub(crate) settings: Settings,
    pub(crate) engine: Option<Box<dyn Engine>>,
    pub(crate) notices: Vec<Notice>,
}

impl Config {
    pub(crate) fn new(settings: Settings) -> Self {
        Self {
            settings,
            engine: None,
            notices: Vec::new(),
        }
    }

    fn notice(&mut self, message: impl Into<String>, key: &str, value: impl Into<FieldValue>) {
        let mut fields = Fields::new();
        fields.insert(key.to_string(), value.into());
        self.notices.push(Notice {
            message: message.into(),
            fields,
        });
    }

    fn set_level_by_name(&mut self, name: &str) {
        match Level::from_name(name) {
            Some(level) => self.settings.level = level,
            None => {
                self.settings.level = Level::Warn;
                self.notice("Invalid log level, defaulting to Warn", "level_name", name);
            }
        }
    }
}

/// A single configuration step.
pub struct LoggerOption(Box<dyn FnOnce(&mut Config) + Send>);

impl LoggerOption {
    fn new<F>(f: F) -> Self
    where
        F: FnOnce(&mut Config) + Send + 'static,
    {
        Self(Box::new(f))
    }

    pub(crate) fn apply(self, config: &mut Config) {
        (self.0)(config)
    }
}

impl fmt::Debug for LoggerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LoggerOption")
    }
}

/// Minimum level for filtering records
pub fn with_level(level: Level) -> LoggerOption {
    LoggerOption::new(move |c| c.settings.level = level)
}

/// Minimum level by name. An unknown name selects [`Level::Warn`] and the
/// logger reports the fallback at warning level.
pub fn with_level_name(name: impl Into<String>) -> LoggerOption {
    let name = name.into();
    LoggerOption::new(move |c| c.set_level_by_name(&name))
}

/// Minimum level from the environment variable `var`, read when the
/// option is applied. An unset variable leaves the level unchanged; an
/// invalid value behaves like [`with_level_name`] with an unknown name.
pub fn with_level_from_env(var: impl Into<String>) -> LoggerOption {
    let var = var.into();
    LoggerOption::new(move |c| match std::env::var(&var) {
        Ok(value) => c.set_level_by_name(&value),
        Err(std::env::VarError::NotPresent) => {}
        Err(std::env::VarError::NotUnicode(_)) => {
            c.settings.level = Level::Warn;
            c.notice(
                "Log level variable is not valid unicode, defaulting to Warn",
                "variable",
                var.as_str(),
            );
        }
    })
}

/// Where records are written. Defaults to standard output.
pub fn with_output(output: impl Into<Output>) -> LoggerOption {
    let output = output.into();
    LoggerOption::new(move |c| c.settings.output = output)
}

/// Time source for record timestamps. Intended for tests.
pub fn with_now_func<F>(now: F) -> LoggerOption
where
    F: Fn() -> DateTime<FixedOffset> + Send + Sync + 'static,
{
    let now: Arc<dyn Fn() -> DateTime<FixedOffset> + Send + Sync> = Arc::new(now);
    LoggerOption::new(move |c| c.settings.now = now)
}

/// Attach `file` and `function` of the calling code to every record
pub fn with_report_caller(enable: bool) -> LoggerOption {
    LoggerOption::new(move |c| c.settings.report_caller = enable)
}

/// Append a hook to the pipeline
pub fn with_hook<H: Hook + 'static>(hook: H) -> LoggerOption {
    let hook: Arc<dyn Hook> = Arc::new(hook);
    LoggerOption::new(move |c| c.settings.hooks.push(hook))
}

/// Append a closure hook to the pipeline
pub fn with_hook_fn<F>(hook: F) -> LoggerOption
where
    F: Fn(&mut HookEntry) -> Result<bool, HookError> + Send + Sync + 'static,
{
    with_hook(hook)
}

/// Sort fields by key in the output
pub fn with_consistent_ordering(enable: bool) -> LoggerOption {
    LoggerOption::new(move |c| c.settings.consistent_ordering = enable)
}

pub fn with_format(format: OutputFormat) -> LoggerOption {
    LoggerOption::new(move |c| c.settings.format = format)
}

pub fn with_timestamp_format(format: TimestampFormat) -> LoggerOption {
    LoggerOption::new(move |c| c.settings.timestamp_format = format)
}

/// Replace process termination after fatal records. Intended for tests.
pub fn with_exit_func<F>(exit: F) -> LoggerOption
where
    F: Fn(i32) + Send + Sync + 'static,
{
    let exit: ExitFn = Arc::new(exit);
    LoggerOption::new(move |c| c.settings.exit = exit)
}

/// Replace the engine. The new engine receives the logger's output,
/// level and format settings.
pub fn with_engine<E: Engine + 'static>(engine: E) -> LoggerOption {
    LoggerOption::new(move |c| c.engine = Some(Box::new(engine)))
}

/// Fluent alternative to a list of options.
///
/// # Example
///
/// ```
/// use rust_log_facade::{Level, LoggerBuilder, SharedBuffer};
///
/// let buffer = SharedBuffer::new();
/// let logger = LoggerBuilder::new()
///     .level(Level::Info)
///     .output(buffer.clone())
///     .report_caller(false)
///     .build();
///
/// logger.info("ready");
/// assert!(buffer.contents().contains("\"msg\":\"ready\""));
/// ```
#[derive(Debug, Default)]
pub struct LoggerBuilder {
    options: Vec<LoggerOption>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an arbitrary option
    #[must_use = "builder methods return a new value"]
    pub fn option(mut self, option: LoggerOption) -> Self {
        self.options.push(option);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(self, level: Level) -> Self {
        self.option(with_level(level))
    }

    #[must_use = "builder methods return a new value"]
    pub fn level_name(self, name: impl Into<String>) -> Self {
        self.option(with_level_name(name))
    }

    #[must_use = "builder methods return a new value"]
    pub fn level_from_env(self, var: impl Into<String>) -> Self {
        self.option(with_level_from_env(var))
    }

    #[must_use = "builder methods return a new value"]
    pub fn output(self, output: impl Into<Output>) -> Self {
        self.option(with_output(output))
    }

    #[must_use = "builder methods return a new value"]
    pub fn now_func<F>(self, now: F) -> Self
    where
        F: Fn() -> DateTime<FixedOffset> + Send + Sync + 'static,
    {
        self.option(with_now_func(now))
    }

    #[must_use = "builder methods return a new value"]
    pub fn report_caller(self, enable: bool) -> Self {
        self.option(with_report_caller(enable))
    }

    #[must_use = "builder methods return a new value"]
    pub fn hook<H: Hook + 'static>(self, hook: H) -> Self {
        self.option(with_hook(hook))
    }

    #[must_use = "builder methods return a new value"]
    pub fn consistent_ordering(self, enable: bool) -> Self {
        self.option(with_consistent_ordering(enable))
    }

    #[must_use = "builder methods return a new value"]
    pub fn format(self, format: OutputFormat) -> Self {
        self.option(with_format(format))
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(self, format: TimestampFormat) -> Self {
        self.option(with_timestamp_format(format))
    }

    #[must_use = "builder methods return a new value"]
    pub fn exit_func<F>(self, exit: F) -> Self
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.option(with_exit_func(exit))
    }

    #[must_use = "builder methods return a new value"]
    pub fn engine<E: Engine + 'static>(self, engine: E) -> Self {
        self.option(with_engine(engine))
    }

    /// The options collected so far, in call order
    pub fn into_options(self) -> Vec<LoggerOption> {
        self.options
    }

    #[must_use]
    pub fn build(self) -> Logger {
        Logger::new(self.options)
    }
}
