//! # Rust Log Facade
//!
//! A stable, leveled, field-annotated structured logging API over a
//! pluggable engine, with adapters that let other frameworks log through
//! the same facade.
//!
//! ## Features
//!
//! - **Immutable entries**: `with_field`/`with_fields`/`with_error`/`with_context`
//!   return new entries, so a base entry can be shared across threads
//! - **Caller reporting**: records carry the `file:line` and function of the
//!   code that logged, not of the facade
//! - **Hooks**: ordered, fallible record rewriting before emission
//! - **JSON lines** by default, logfmt and text on request
//! - **Global logger** that can be reconfigured at any time
//!
//! ## Quick start
//!
//! ```
//! use rust_log_facade::prelude::*;
//!
//! let buffer = SharedBuffer::new();
//! let logger = Logger::new([
//!     with_level(Level::Info),
//!     with_output(buffer.clone()),
//!     with_consistent_ordering(true),
//! ]);
//!
//! logger
//!     .with_field("defaultsLoaded", true)
//!     .with_field("timeSpentOnConfiguration", 0)
//!     .warn("Finished loading configuration");
//!
//! let line = buffer.lines().remove(0);
//! assert!(line.starts_with("{\"level\":\"warning\",\"time\":"));
//! ```
//!
//! Logging at [`Level::Fatal`] writes the record and then terminates the
//! process with exit code 1, whichever method was used to log it.

pub mod adapters;
pub mod core;
pub mod engine;
pub mod global;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        with_consistent_ordering, with_engine, with_exit_func, with_format, with_hook,
        with_hook_fn, with_level, with_level_from_env, with_level_name, with_now_func,
        with_output, with_report_caller, with_timestamp_format, CallerFrame, Context, Entry,
        FieldValue, Fields, Hook, HookEntry, HookError, Level, Logger, LoggerBuilder,
        LoggerConfig, LoggerError, LoggerMetrics, LoggerOption, Output, Result, SharedBuffer,
        TimestampFormat,
    };
    pub use crate::engine::{Engine, OutputFormat, WriterEngine};
    pub use crate::global::{configure_global, global, new_global};
}

pub use crate::core::{
    package_name, resolve_caller, with_consistent_ordering, with_engine, with_exit_func,
    with_format, with_hook, with_hook_fn, with_level, with_level_from_env, with_level_name,
    with_now_func, with_output, with_report_caller, with_timestamp_format, wall_clock,
    CallerFrame, Context, Entry, ExitFn, FieldValue, Fields, Hook, HookEntry, HookError, Level,
    Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, LoggerOption, NowFn,
    Output, Record, Result, SharedBuffer, TimestampFormat,
};
pub use crate::engine::{Engine, FormatSettings, OutputFormat, WriterEngine};
pub use crate::global::{configure_global, global, new_global};
