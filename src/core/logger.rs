//! Main logger implementation
//!
//! A [`Logger`] is a cheap, cloneable handle. Facade settings (level, hooks,
//! time source, caller reporting) live in an atomically swapped snapshot
//! that every log call reads without locking. The engine sits behind a
//! read/write lock: records are written under the read lock and
//! reconfiguration takes the write lock.

use super::{
    caller::{resolve_caller, CallerFrame},
    context::Context,
    entry::Entry,
    error::Result,
    fields::{FieldValue, Fields},
    hooks::{run_hooks, Hook, HookEntry},
    level::Level,
    metrics::LoggerMetrics,
    options::{default_exit_fn, Config, ExitFn, LoggerBuilder, LoggerOption, Notice},
    output::Output,
    record::Record,
    timestamp::{default_now_fn, NowFn, TimestampFormat},
};
use crate::engine::{Engine, OutputFormat, WriterEngine};
use arc_swap::ArcSwap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Keys added for the calling code when caller reporting is enabled.
pub const CALLER_KEYS: [&str; 2] = ["file", "function"];

#[derive(Clone)]
pub(crate) struct Settings {
    pub level: Level,
    pub now: NowFn,
    pub report_caller: bool,
    pub hooks: Vec<Arc<dyn Hook>>,
    pub consistent_ordering: bool,
    pub exit: ExitFn,
    pub format: OutputFormat,
    pub timestamp_format: TimestampFormat,
    pub output: Output,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: Level::Warn,
            now: default_now_fn(),
            report_caller: true,
            hooks: Vec::new(),
            consistent_ordering: false,
            exit: default_exit_fn(),
            format: OutputFormat::default(),
            timestamp_format: TimestampFormat::default(),
            output: Output::stdout(),
        }
    }
}

struct LoggerInner {
    settings: ArcSwap<Settings>,
    engine: RwLock<Box<dyn Engine>>,
    metrics: LoggerMetrics,
}

/// Leveled, field-annotated logger.
///
/// # Example
///
/// ```
/// use rust_log_facade::{Level, Logger, SharedBuffer, with_level, with_output};
///
/// let buffer = SharedBuffer::new();
/// let logger = Logger::new([with_level(Level::Info), with_output(buffer.clone())]);
///
/// logger.with_field("user", "alice").info("signed in");
/// logger.debug("not written");
///
/// assert_eq!(buffer.lines().len(), 1);
/// ```
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    /// Create a logger from the defaults and `options`, applied in order.
    ///
    /// Defaults: level [`Level::Warn`], caller reporting on, standard
    /// output, JSON format, wall-clock time.
    pub fn new<I>(options: I) -> Self
    where
        I: IntoIterator<Item = LoggerOption>,
    {
        let logger = Self {
            inner: Arc::new(LoggerInner {
                settings: ArcSwap::from_pointee(Settings::default()),
                engine: RwLock::new(Box::new(WriterEngine::default())),
                metrics: LoggerMetrics::new(),
            }),
        };
        logger.reset(options);
        logger
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Apply `options` on top of the current configuration.
    pub fn configure<I>(&self, options: I)
    where
        I: IntoIterator<Item = LoggerOption>,
    {
        let base = Settings::clone(&self.inner.settings.load());
        self.install(base, None, options);
    }

    /// Return to the defaults (including the default engine), then apply
    /// `options`.
    pub fn reset<I>(&self, options: I)
    where
        I: IntoIterator<Item = LoggerOption>,
    {
        let engine: Box<dyn Engine> = Box::new(WriterEngine::default());
        self.install(Settings::default(), Some(engine), options);
    }

    fn install<I>(&self, base: Settings, engine: Option<Box<dyn Engine>>, options: I)
    where
        I: IntoIterator<Item = LoggerOption>,
    {
        let notices = {
            let mut current = self.inner.engine.write();

            let mut config = Config::new(base);
            config.engine = engine;
            for option in options {
                option.apply(&mut config);
            }

            let Config {
                settings,
                engine,
                notices,
            } = config;

            if let Some(engine) = engine {
                *current = engine;
            }
            current.set_output(settings.output.clone());
            current.set_level(settings.level);
            current.set_consistent_ordering(settings.consistent_ordering);
            current.set_format(settings.format);
            current.set_timestamp_format(settings.timestamp_format.clone());

            self.inner.settings.store(Arc::new(settings));
            notices
        };

        // Reported only after the write lock is released: the notices go
        // through this logger.
        for Notice { message, fields } in notices {
            self.entry().with_fields(fields).warn(message);
        }
    }

    pub fn set_level(&self, level: Level) {
        self.configure([super::options::with_level(level)]);
    }

    pub fn level(&self) -> Level {
        self.inner.settings.load().level
    }

    /// Whether a record at `level` passes the configured minimum level
    pub fn enabled(&self, level: Level) -> bool {
        self.inner.settings.load().level.enables(level)
    }

    pub fn report_caller(&self) -> bool {
        self.inner.settings.load().report_caller
    }

    /// Output records are currently written to
    pub fn output_handler(&self) -> Output {
        self.inner.settings.load().output.clone()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.inner.metrics
    }

    pub fn engine_name(&self) -> String {
        self.inner.engine.read().name().to_string()
    }

    pub fn flush(&self) -> Result<()> {
        self.inner.engine.read().flush()
    }

    /// An entry without fields
    pub fn entry(&self) -> Entry {
        Entry::new(self.clone())
    }

    pub fn with_field(&self, key: impl Into<String>, value: impl Into<FieldValue>) -> Entry {
        self.entry().with_field(key, value)
    }

    pub fn with_fields<I, K, V>(&self, fields: I) -> Entry
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.entry().with_fields(fields)
    }

    /// Shorthand for `with_field("error", err)`
    pub fn with_error<E>(&self, err: &E) -> Entry
    where
        E: std::error::Error + ?Sized,
    {
        self.entry().with_error(err)
    }

    pub fn with_context(&self, ctx: Context) -> Entry {
        self.entry().with_context(ctx)
    }

    pub fn debug(&self, msg: impl fmt::Display) {
        self.entry().debug(msg)
    }

    pub fn debug_fmt(&self, args: fmt::Arguments<'_>) {
        self.entry().debug_fmt(args)
    }

    pub fn info(&self, msg: impl fmt::Display) {
        self.entry().info(msg)
    }

    pub fn info_fmt(&self, args: fmt::Arguments<'_>) {
        self.entry().info_fmt(args)
    }

    pub fn warn(&self, msg: impl fmt::Display) {
        self.entry().warn(msg)
    }

    pub fn warn_fmt(&self, args: fmt::Arguments<'_>) {
        self.entry().warn_fmt(args)
    }

    pub fn error(&self, msg: impl fmt::Display) {
        self.entry().error(msg)
    }

    pub fn error_fmt(&self, args: fmt::Arguments<'_>) {
        self.entry().error_fmt(args)
    }

    /// Log at [`Level::Fatal`], then terminate the process with exit code 1.
    pub fn fatal(&self, msg: impl fmt::Display) {
        self.entry().fatal(msg)
    }

    pub fn fatal_fmt(&self, args: fmt::Arguments<'_>) {
        self.entry().fatal_fmt(args)
    }

    pub fn log(&self, level: Level, msg: impl fmt::Display) {
        self.entry().log(level, msg)
    }

    pub fn log_fmt(&self, level: Level, args: fmt::Arguments<'_>) {
        self.entry().log_fmt(level, args)
    }

    pub(crate) fn record_suppressed(&self) {
        self.inner.metrics.record_suppressed();
    }

    /// Resolve, run hooks and write one record, then honour fatal.
    ///
    /// Process termination depends on the level that was requested, not on
    /// a level a hook may have rewritten.
    pub(crate) fn emit(
        &self,
        level: Level,
        message: String,
        fields: &Fields,
        context: Option<&Context>,
        caller: Option<&CallerFrame>,
    ) {
        let settings = self.inner.settings.load_full();
        let metrics = &self.inner.metrics;

        if !settings.level.enables(level) {
            metrics.record_suppressed();
            return;
        }

        let mut fields = fields.clone();
        if settings.report_caller {
            // Direct call: a generic adaptor in between would be taken for
            // the calling code.
            let frame = match caller {
                Some(frame) => Some(frame.clone()),
                None => resolve_caller(),
            };
            if let Some(frame) = frame {
                attach_caller(&mut fields, frame);
            }
        }

        let mut entry = HookEntry {
            fields,
            level,
            message,
            context: context.cloned(),
        };
        if !settings.hooks.is_empty() {
            entry = run_hooks(&settings.hooks, entry, metrics);
        }

        let record = Record::from_hook_entry(entry, (settings.now)());

        {
            let engine = self.inner.engine.read();
            if engine.enabled(record.level) {
                match engine.log(&record) {
                    Ok(()) => {
                        metrics.record_written();
                    }
                    Err(e) => {
                        eprintln!("[LOGGER ERROR] Engine '{}' failed: {}", engine.name(), e);
                        metrics.record_write_failure();
                    }
                }
            } else {
                metrics.record_suppressed();
            }

            if level == Level::Fatal {
                if let Err(e) = engine.flush() {
                    eprintln!("[LOGGER ERROR] Failed to flush before exit: {}", e);
                }
            }
        }

        if level == Level::Fatal {
            (settings.exit)(1);
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settings = self.inner.settings.load();
        f.debug_struct("Logger")
            .field("level", &settings.level)
            .field("report_caller", &settings.report_caller)
            .field("hooks", &settings.hooks.len())
            .field("output", &settings.output)
            .field("format", &settings.format)
            .finish()
    }
}

/// A user field named like a caller key moves to `fields.<key>`.
fn attach_caller(fields: &mut Fields, frame: CallerFrame) {
    for key in CALLER_KEYS {
        if let Some(value) = fields.remove(key) {
            fields.insert(format!("fields.{}", key), value);
        }
    }
    fields.insert("file".to_string(), FieldValue::String(frame.location()));
    fields.insert("function".to_string(), FieldValue::String(frame.function));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::{
        with_exit_func, with_hook_fn, with_level, with_level_name, with_now_func, with_output,
        with_report_caller,
    };
    use crate::core::output::SharedBuffer;
    use chrono::DateTime;
    use std::sync::atomic::{AtomicI32, Ordering};

    fn fixed_now() -> DateTime<chrono::FixedOffset> {
        DateTime::parse_from_rfc3339("2020-10-10T10:10:10Z").unwrap()
    }

    fn buffered(options: Vec<LoggerOption>) -> (Logger, SharedBuffer) {
        let buffer = SharedBuffer::new();
        let mut all = vec![
            with_output(buffer.clone()),
            with_now_func(fixed_now),
            with_report_caller(false),
        ];
        all.extend(options);
        (Logger::new(all), buffer)
    }

    fn parse(line: &str) -> serde_json::Value {
        serde_json::from_str(line).expect("valid JSON line")
    }

    #[test]
    fn test_default_level_is_warn() {
        let (logger, buffer) = buffered(vec![]);
        assert_eq!(logger.level(), Level::Warn);

        logger.info("dropped");
        logger.warn("kept");

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0],
            "{\"level\":\"warning\",\"time\":\"2020-10-10T10:10:10Z\",\"msg\":\"kept\"}"
        );
        assert_eq!(logger.metrics().records_suppressed(), 1);
        assert_eq!(logger.metrics().records_written(), 1);
    }

    #[test]
    fn test_configure_keeps_previous_settings() {
        let (logger, buffer) = buffered(vec![with_level(Level::Debug)]);
        logger.configure([with_level(Level::Error)]);

        logger.warn("filtered");
        logger.error("written");

        assert_eq!(buffer.lines().len(), 1);
        assert_eq!(logger.output_handler().name(), "buffer");
    }

    #[test]
    fn test_reset_restores_defaults() {
        let (logger, _buffer) = buffered(vec![with_level(Level::Debug)]);
        logger.reset([with_report_caller(false)]);

        assert_eq!(logger.level(), Level::Warn);
        assert_eq!(logger.output_handler().name(), "stdout");
    }

    #[test]
    fn test_invalid_level_name_is_reported_through_logger() {
        let (logger, buffer) = buffered(vec![with_level_name("chatty")]);

        assert_eq!(logger.level(), Level::Warn);
        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        let record = parse(&lines[0]);
        assert_eq!(record["level"], "warning");
        assert_eq!(record["level_name"], "chatty");
    }

    #[test]
    fn test_fatal_calls_exit_once_per_call() {
        let code = Arc::new(AtomicI32::new(0));
        let calls = Arc::new(AtomicI32::new(0));
        let (c, n) = (Arc::clone(&code), Arc::clone(&calls));
        let (logger, buffer) = buffered(vec![with_exit_func(move |exit_code| {
            c.store(exit_code, Ordering::SeqCst);
            n.fetch_add(1, Ordering::SeqCst);
        })]);

        logger.fatal("plain");
        logger.fatal_fmt(format_args!("formatted {}", 1));
        logger.log(Level::Fatal, "generic");
        logger.error("not fatal");

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(code.load(Ordering::SeqCst), 1);
        assert_eq!(buffer.lines().len(), 4);
    }

    #[test]
    fn test_hook_level_rewrite_is_filtered_by_engine() {
        let (logger, buffer) = buffered(vec![
            with_level(Level::Info),
            with_hook_fn(|e| {
                e.level = Level::Debug;
                Ok(true)
            }),
        ]);

        logger.info("demoted");
        assert!(buffer.is_empty());
        assert_eq!(logger.metrics().records_suppressed(), 1);
    }

    #[test]
    fn test_caller_fields_move_user_keys() {
        let mut fields = Fields::new();
        fields.insert("file".into(), "config.toml".into());

        attach_caller(&mut fields, CallerFrame::new("src/main.rs", 3, "app::main"));

        assert_eq!(fields.get("file"), Some(&FieldValue::from("src/main.rs:3")));
        assert_eq!(fields.get("function"), Some(&FieldValue::from("app::main")));
        assert_eq!(fields.get("fields.file"), Some(&FieldValue::from("config.toml")));
    }

    #[test]
    fn test_caller_reported_when_enabled() {
        let (logger, buffer) = buffered(vec![with_report_caller(true)]);
        logger.warn("with caller");

        let record = parse(&buffer.lines()[0]);
        assert!(record["file"].as_str().unwrap().contains(".rs:"));
        assert!(record["function"].is_string());
    }
}
