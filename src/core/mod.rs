//! Core facade types: levels, fields, entries, hooks and the logger

pub mod caller;
pub mod config;
pub mod context;
pub mod entry;
pub mod error;
pub mod fields;
pub mod hooks;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod options;
pub mod output;
pub mod record;
pub mod timestamp;

pub use caller::{package_name, resolve_caller, CallerFrame, MAXIMUM_CALLER_DEPTH};
pub use config::LoggerConfig;
pub use context::Context;
pub use entry::Entry;
pub use error::{HookError, LoggerError, Result};
pub use fields::{FieldValue, Fields};
pub use hooks::{Hook, HookEntry};
pub use level::{Level, LEVEL_NAMES};
pub use logger::{Logger, CALLER_KEYS};
pub use metrics::LoggerMetrics;
pub use options::{
    with_consistent_ordering, with_engine, with_exit_func, with_format, with_hook, with_hook_fn,
    with_level, with_level_from_env, with_level_name, with_now_func, with_output,
    with_report_caller, with_timestamp_format, ExitFn, LoggerBuilder, LoggerOption,
};
pub use output::{Output, SharedBuffer};
pub use record::Record;
pub use timestamp::{wall_clock, NowFn, TimestampFormat};
