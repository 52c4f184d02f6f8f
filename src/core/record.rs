//! Final record handed to the engine

use super::{context::Context, fields::Fields, hooks::HookEntry, level::Level};
use chrono::{DateTime, FixedOffset};

/// A fully resolved log record: hooks have run and caller fields, when
/// enabled, are already part of `fields`.
#[derive(Debug, Clone)]
pub struct Record {
    pub level: Level,
    pub message: String,
    pub fields: Fields,
    pub time: DateTime<FixedOffset>,
    pub context: Option<Context>,
}

impl Record {
    pub fn new(level: Level, message: impl Into<String>, time: DateTime<FixedOffset>) -> Self {
        Self {
            level,
            message: message.into(),
            fields: Fields::new(),
            time,
            context: None,
        }
    }

    pub(crate) fn from_hook_entry(entry: HookEntry, time: DateTime<FixedOffset>) -> Self {
        Self {
            level: entry.level,
            message: entry.message,
            fields: entry.fields,
            time,
            context: entry.context,
        }
    }

    /// Field keys in output order: sorted when `consistent` is set,
    /// otherwise in map order.
    pub fn field_keys(&self, consistent: bool) -> Vec<&str> {
        let mut keys: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        if consistent {
            keys.sort_unstable();
        }
        keys
    }
}
