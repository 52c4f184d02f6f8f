//! Hook pipeline
//!
//! Hooks inspect and rewrite a record before it reaches the engine. Each
//! hook works on its own copy of the record; the copy replaces the working
//! record only when the hook reports a change. Hooks run in registration
//! order, so each one sees the mutations adopted from the hooks before it.

use super::{
    context::Context,
    error::HookError,
    fields::{FieldValue, Fields},
    level::Level,
    metrics::LoggerMetrics,
};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Mutable view of a record handed to each hook.
#[derive(Debug, Clone)]
pub struct HookEntry {
    pub fields: Fields,
    pub level: Level,
    pub message: String,
    pub context: Option<Context>,
}

impl HookEntry {
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn remove_field(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    /// Typed value from the attached context, if any.
    pub fn context_value<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.context.as_ref().and_then(|ctx| ctx.value::<T>())
    }
}

/// Extension invoked on every record before emission.
///
/// Return `Ok(true)` to have the mutations adopted, `Ok(false)` to discard
/// them. An error is reported on stderr and the mutations are discarded;
/// the record is still emitted.
///
/// Closures with the matching signature are hooks:
///
/// ```
/// use rust_log_facade::{HookEntry, HookError};
///
/// let redact = |entry: &mut HookEntry| -> Result<bool, HookError> {
///     if entry.remove_field("password").is_some() {
///         entry.set_field("password", "<redacted>");
///         return Ok(true);
///     }
///     Ok(false)
/// };
/// # let _ = redact;
/// ```
pub trait Hook: Send + Sync {
    fn fire(&self, entry: &mut HookEntry) -> Result<bool, HookError>;
}

impl<F> Hook for F
where
    F: Fn(&mut HookEntry) -> Result<bool, HookError> + Send + Sync,
{
    fn fire(&self, entry: &mut HookEntry) -> Result<bool, HookError> {
        self(entry)
    }
}

/// Run `hooks` in order over `entry` and return the resulting record.
pub(crate) fn run_hooks(
    hooks: &[Arc<dyn Hook>],
    entry: HookEntry,
    metrics: &LoggerMetrics,
) -> HookEntry {
    let mut current = entry;

    for (idx, hook) in hooks.iter().enumerate() {
        let mut candidate = current.clone();
        let result = catch_unwind(AssertUnwindSafe(|| hook.fire(&mut candidate)));

        match result {
            Ok(Ok(true)) => current = candidate,
            Ok(Ok(false)) => {}
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Hook #{} failed: {}", idx, e);
                metrics.record_hook_failure();
            }
            Err(panic_info) => {
                eprintln!(
                    "[LOGGER CRITICAL] Hook #{} panicked: {}. \
                     Remaining hooks continue to run.",
                    idx,
                    panic_message(panic_info.as_ref())
                );
                metrics.record_hook_failure();
            }
        }
    }

    current
}

pub(crate) fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
