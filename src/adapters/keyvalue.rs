//! Logger for RPC frameworks that log alternating key/value pairs

use crate::core::{
    error::Result,
    fields::{FieldValue, Fields},
    level::Level,
    logger::Logger,
};

/// Value recorded for a trailing key without a value.
pub const UNPAIRED_VALUE: &str = "KEYVALS UNPAIRED";

const MESSAGE_KEY: &str = "msg";

/// Adapter for `log(level, k1, v1, k2, v2, ...)` style interfaces.
///
/// Keys are rendered with their `Display` form. A `msg` key becomes the
/// record message, every other pair becomes a field.
#[derive(Debug, Clone)]
pub struct KeyValueLogger {
    logger: Logger,
}

impl KeyValueLogger {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Write one record built from `keyvals`.
    ///
    /// The `Result` mirrors RPC logger interfaces whose `log` call returns
    /// an error. Writing through the facade cannot fail here, so this
    /// always returns `Ok(())`, also for empty input and disabled levels.
    pub fn log(&self, level: Level, keyvals: &[FieldValue]) -> Result<()> {
        if keyvals.is_empty() {
            return Ok(());
        }

        let mut fields = Fields::with_capacity(keyvals.len() / 2 + 1);
        for pair in keyvals.chunks(2) {
            let key = pair[0].to_string();
            let value = pair
                .get(1)
                .cloned()
                .unwrap_or_else(|| FieldValue::from(UNPAIRED_VALUE));
            fields.insert(key, value);
        }

        let message = fields
            .remove(MESSAGE_KEY)
            .map(|v| v.to_string())
            .unwrap_or_default();

        self.logger.with_fields(fields).log(level, message);
        Ok(())
    }
}
