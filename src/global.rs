//! Process-wide logger
//!
//! Created with the defaults on first access and reconfigurable at any time.
//! The free functions below forward to it.

use crate::core::{
    context::Context,
    entry::Entry,
    fields::FieldValue,
    level::Level,
    logger::Logger,
    options::{with_level, with_now_func, with_output, with_report_caller, LoggerOption},
    output::Output,
};
use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use std::fmt;

static GLOBAL: Lazy<Logger> = Lazy::new(Logger::default);

/// The process-wide logger
pub fn global() -> &'static Logger {
    &GLOBAL
}

/// Apply `options` on top of the current global configuration
pub fn configure_global<I>(options: I)
where
    I: IntoIterator<Item = LoggerOption>,
{
    GLOBAL.configure(options)
}

/// Reset the global logger to the defaults, then apply `options`
pub fn new_global<I>(options: I)
where
    I: IntoIterator<Item = LoggerOption>,
{
    GLOBAL.reset(options)
}

pub fn set_output(output: impl Into<Output>) {
    configure_global([with_output(output)])
}

pub fn set_level(level: Level) {
    configure_global([with_level(level)])
}

pub fn set_now_func<F>(now: F)
where
    F: Fn() -> DateTime<FixedOffset> + Send + Sync + 'static,
{
    configure_global([with_now_func(now)])
}

pub fn set_report_caller(enable: bool) {
    configure_global([with_report_caller(enable)])
}

pub fn with_field(key: impl Into<String>, value: impl Into<FieldValue>) -> Entry {
    GLOBAL.with_field(key, value)
}

pub fn with_fields<I, K, V>(fields: I) -> Entry
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FieldValue>,
{
    GLOBAL.with_fields(fields)
}

pub fn with_error<E>(err: &E) -> Entry
where
    E: std::error::Error + ?Sized,
{
    GLOBAL.with_error(err)
}

pub fn with_context(ctx: Context) -> Entry {
    GLOBAL.with_context(ctx)
}

pub fn debug(msg: impl fmt::Display) {
    GLOBAL.debug(msg)
}

pub fn debug_fmt(args: fmt::Arguments<'_>) {
    GLOBAL.debug_fmt(args)
}

pub fn info(msg: impl fmt::Display) {
    GLOBAL.info(msg)
}

pub fn info_fmt(args: fmt::Arguments<'_>) {
    GLOBAL.info_fmt(args)
}

pub fn warn(msg: impl fmt::Display) {
    GLOBAL.warn(msg)
}

pub fn warn_fmt(args: fmt::Arguments<'_>) {
    GLOBAL.warn_fmt(args)
}

pub fn error(msg: impl fmt::Display) {
    GLOBAL.error(msg)
}

pub fn error_fmt(args: fmt::Arguments<'_>) {
    GLOBAL.error_fmt(args)
}

/// Log at [`Level::Fatal`] through the global logger, then exit with code 1
pub fn fatal(msg: impl fmt::Display) {
    GLOBAL.fatal(msg)
}

pub fn fatal_fmt(args: fmt::Arguments<'_>) {
    GLOBAL.fatal_fmt(args)
}

pub fn log(level: Level, msg: impl fmt::Display) {
    GLOBAL.log(level, msg)
}

pub fn log_fmt(level: Level, args: fmt::Arguments<'_>) {
    GLOBAL.log_fmt(level, args)
}
