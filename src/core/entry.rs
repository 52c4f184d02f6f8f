//! Field-accumulating log entries
//!
//! Every `with_*` call returns a new [`Entry`] holding its own copy of the
//! fields, so an entry can be shared, reused and derived from on many
//! threads without any of the derivations being visible to the others.

use super::{
    caller::CallerFrame,
    context::Context,
    fields::{FieldValue, Fields},
    level::Level,
    logger::Logger,
};
use std::fmt;

/// Immutable snapshot of fields and context bound to a [`Logger`].
///
/// # Example
///
/// ```
/// use rust_log_facade::{Logger, SharedBuffer, with_output};
///
/// let buffer = SharedBuffer::new();
/// let logger = Logger::new([with_output(buffer.clone())]);
///
/// let base = logger.with_field("service", "billing");
/// let derived = base.with_field("attempt", 2);
///
/// assert_eq!(base.fields().len(), 1);
/// assert_eq!(derived.fields().len(), 2);
///
/// derived.error("charge declined");
/// ```
#[derive(Clone)]
pub struct Entry {
    logger: Logger,
    fields: Fields,
    context: Option<Context>,
    caller: Option<CallerFrame>,
}

impl Entry {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            fields: Fields::new(),
            context: None,
            caller: None,
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    fn derive(&self, fields: Fields) -> Self {
        Self {
            logger: self.logger.clone(),
            fields,
            context: self.context.clone(),
            caller: self.caller.clone(),
        }
    }

    /// New entry with `key` set to `value`
    #[must_use]
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<FieldValue>) -> Entry {
        let mut fields = self.fields.clone();
        fields.insert(key.into(), value.into());
        self.derive(fields)
    }

    /// New entry with all of `fields` merged in; new keys win on conflict
    #[must_use]
    pub fn with_fields<I, K, V>(&self, fields: I) -> Entry
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let mut merged = self.fields.clone();
        merged.extend(fields.into_iter().map(|(k, v)| (k.into(), v.into())));
        self.derive(merged)
    }

    /// Shorthand for `with_field("error", err)`. The error is recorded as
    /// its message.
    #[must_use]
    pub fn with_error<E>(&self, err: &E) -> Entry
    where
        E: std::error::Error + ?Sized,
    {
        self.with_field("error", FieldValue::String(err.to_string()))
    }

    #[must_use]
    pub fn with_context(&self, ctx: Context) -> Entry {
        let mut entry = self.derive(self.fields.clone());
        entry.context = Some(ctx);
        entry
    }

    /// New entry that reports `frame` instead of resolving the caller.
    ///
    /// For bridges that receive the call site from another logging API.
    #[must_use]
    pub fn with_caller_frame(&self, frame: CallerFrame) -> Entry {
        let mut entry = self.derive(self.fields.clone());
        entry.caller = Some(frame);
        entry
    }

    pub fn debug(&self, msg: impl fmt::Display) {
        self.log(Level::Debug, msg)
    }

    pub fn debug_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Debug, args)
    }

    pub fn info(&self, msg: impl fmt::Display) {
        self.log(Level::Info, msg)
    }

    pub fn info_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Info, args)
    }

    pub fn warn(&self, msg: impl fmt::Display) {
        self.log(Level::Warn, msg)
    }

    pub fn warn_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Warn, args)
    }

    pub fn error(&self, msg: impl fmt::Display) {
        self.log(Level::Error, msg)
    }

    pub fn error_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Error, args)
    }

    /// Log at [`Level::Fatal`], then terminate the process with exit code 1.
    pub fn fatal(&self, msg: impl fmt::Display) {
        self.log(Level::Fatal, msg)
    }

    pub fn fatal_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Fatal, args)
    }

    /// Log `msg` at `level`. A fatal level terminates the process like
    /// [`Entry::fatal`].
    pub fn log(&self, level: Level, msg: impl fmt::Display) {
        if !self.logger.enabled(level) {
            self.logger.record_suppressed();
            return;
        }
        self.dispatch(level, msg.to_string())
    }

    pub fn log_fmt(&self, level: Level, args: fmt::Arguments<'_>) {
        if !self.logger.enabled(level) {
            self.logger.record_suppressed();
            return;
        }
        let message = match args.as_str() {
            Some(s) => s.to_string(),
            None => fmt::format(args),
        };
        self.dispatch(level, message)
    }

    fn dispatch(&self, level: Level, message: String) {
        self.logger.emit(
            level,
            message,
            &self.fields,
            self.context.as_ref(),
            self.caller.as_ref(),
        )
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("fields", &self.fields)
            .field("context", &self.context)
            .field("caller", &self.caller)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::{with_level, with_output, with_report_caller};
    use crate::core::output::SharedBuffer;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::thread;

    fn logger() -> (Logger, SharedBuffer) {
        let buffer = SharedBuffer::new();
        let logger = Logger::new([
            with_output(buffer.clone()),
            with_level(Level::Debug),
            with_report_caller(false),
        ]);
        (logger, buffer)
    }

    #[test]
    fn test_with_field_does_not_mutate_receiver() {
        let (logger, _) = logger();
        let base = logger.with_field("a", 1);
        let derived = base.with_field("b", 2).with_field("a", 3);

        assert_eq!(base.fields().len(), 1);
        assert_eq!(base.fields().get("a"), Some(&FieldValue::Int(1)));
        assert_eq!(derived.fields().get("a"), Some(&FieldValue::Int(3)));
        assert_eq!(derived.fields().get("b"), Some(&FieldValue::Int(2)));
    }

    #[test]
    fn test_with_fields_merges_last_write_wins() {
        let (logger, _) = logger();
        let base = logger.with_fields([("a", 1), ("b", 2)]);

        let mut extra = HashMap::new();
        extra.insert("b".to_string(), FieldValue::from("two"));
        extra.insert("c".to_string(), FieldValue::Bool(true));
        let merged = base.with_fields(extra);

        assert_eq!(base.fields().get("b"), Some(&FieldValue::Int(2)));
        assert_eq!(merged.fields().get("b"), Some(&FieldValue::from("two")));
        assert_eq!(merged.fields().len(), 3);
    }

    #[test]
    fn test_with_error_records_message() {
        let (logger, buffer) = logger();
        let err = std::io::Error::new(std::io::ErrorKind::Other, "foobar");
        logger.with_error(&err).error("failed");

        let record: serde_json::Value = serde_json::from_str(&buffer.lines()[0]).unwrap();
        assert_eq!(record["error"], "foobar");
    }

    #[test]
    fn test_with_context_keeps_fields() {
        let (logger, _) = logger();
        let ctx = Context::new().with_value(5u8);
        let entry = logger.with_field("k", "v").with_context(ctx.clone());

        assert!(entry.context().unwrap().ptr_eq(&ctx));
        assert_eq!(entry.fields().len(), 1);
    }

    #[test]
    fn test_concurrent_derivation_from_shared_entry() {
        let (logger, _) = logger();
        let base = Arc::new(logger.with_field("shared", true));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let base = Arc::clone(&base);
                thread::spawn(move || {
                    let derived = base.with_field(format!("k{}", i), i);
                    assert_eq!(derived.fields().len(), 2);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(base.fields().len(), 1);
    }

    #[test]
    fn test_formatted_message() {
        let (logger, buffer) = logger();
        logger.entry().info_fmt(format_args!("{} + {} = {}", 1, 2, 3));
        logger.entry().warn_fmt(format_args!("static"));

        let lines = buffer.lines();
        assert!(lines[0].contains("\"msg\":\"1 + 2 = 3\""));
        assert!(lines[1].contains("\"msg\":\"static\""));
    }

    #[test]
    fn test_caller_frame_override() {
        let buffer = SharedBuffer::new();
        let logger = Logger::new([with_output(buffer.clone())]);

        logger
            .entry()
            .with_caller_frame(CallerFrame::new("lib/db.rs", 42, "db::connect"))
            .warn("override");

        let record: serde_json::Value = serde_json::from_str(&buffer.lines()[0]).unwrap();
        assert_eq!(record["file"], "lib/db.rs:42");
        assert_eq!(record["function"], "db::connect");
    }
}
