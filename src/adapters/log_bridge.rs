//! Bridge from the `log` crate
//!
//! Installs a [`log::Log`] implementation so that `log::info!` and friends
//! (including structured `key = value` pairs) are written through a facade
//! [`Logger`]. The call site reported is the one captured by the `log`
//! macros.

use crate::core::{
    caller::CallerFrame,
    error::{LoggerError, Result},
    fields::{FieldValue, Fields},
    level::Level,
    logger::Logger,
};
use log::kv::{self, VisitSource};

/// [`log::Log`] implementation writing through a facade [`Logger`].
#[derive(Debug, Clone)]
pub struct LogBridge {
    logger: Logger,
}

impl LogBridge {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Install as the `log` crate's global logger.
    ///
    /// Level filtering is left to the facade, so the `log` max level is
    /// opened to `Trace`. Fails if another `log` logger is already set.
    pub fn install(logger: Logger) -> Result<()> {
        log::set_boxed_logger(Box::new(Self::new(logger)))
            .map_err(|e| LoggerError::adapter("log", e.to_string()))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.logger.enabled(Level::from(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        let level = Level::from(record.level());
        if !self.logger.enabled(level) {
            self.logger.record_suppressed();
            return;
        }

        let mut collector = FieldCollector::default();
        collector
            .fields
            .insert("target".to_string(), FieldValue::from(record.target()));
        if let Err(e) = record.key_values().visit(&mut collector) {
            eprintln!("[LOGGER ERROR] Failed to read log key-values: {}", e);
        }

        let frame = CallerFrame::new(
            record.file().unwrap_or_else(|| record.target()),
            record.line().unwrap_or(0),
            record.module_path().unwrap_or_else(|| record.target()),
        );

        self.logger
            .with_fields(collector.fields)
            .with_caller_frame(frame)
            .log_fmt(level, *record.args());
    }

    fn flush(&self) {
        if let Err(e) = self.logger.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush: {}", e);
        }
    }
}

#[derive(Default)]
struct FieldCollector {
    fields: Fields,
}

impl<'kvs> VisitSource<'kvs> for FieldCollector {
    fn visit_pair(
        &mut self,
        key: kv::Key<'kvs>,
        value: kv::Value<'kvs>,
    ) -> std::result::Result<(), kv::Error> {
        self.fields
            .insert(key.as_str().to_string(), field_value(&value));
        Ok(())
    }
}

fn field_value(value: &kv::Value<'_>) -> FieldValue {
    if let Some(b) = value.to_bool() {
        FieldValue::Bool(b)
    } else if let Some(i) = value.to_i64() {
        FieldValue::Int(i)
    } else if let Some(u) = value.to_u64() {
        FieldValue::UInt(u)
    } else if let Some(f) = value.to_f64() {
        FieldValue::Float(f)
    } else if let Some(s) = value.to_borrowed_str() {
        FieldValue::from(s)
    } else {
        FieldValue::String(value.to_string())
    }
}
