//! Tests for the process-wide logger
//!
//! The global logger is shared by every test in this binary, so each test
//! holds `GLOBAL_LOCK` and starts from `new_global`.

use chrono::{DateTime, FixedOffset};
use rust_log_facade::adapters::{with_global_logger, SqlLogger, WebLevel, WebLogger};
use rust_log_facade::global;
use rust_log_facade::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

static GLOBAL_LOCK: Mutex<()> = Mutex::new(());

fn fixed_now() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2020-10-10T10:10:10Z").unwrap()
}

fn fresh_global(level: Level) -> (MutexGuard<'static, ()>, SharedBuffer) {
    let guard = GLOBAL_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let buffer = SharedBuffer::new();
    new_global([
        with_output(buffer.clone()),
        with_level(level),
        with_now_func(fixed_now),
        with_report_caller(false),
    ]);
    (guard, buffer)
}

fn parse(line: &str) -> serde_json::Value {
    serde_json::from_str(line).expect("valid JSON line")
}

#[test]
fn test_default_level_is_warning() {
    let _guard = GLOBAL_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    new_global(Vec::new());
    assert_eq!(global().level(), Level::Warn);
    assert!(global().report_caller());
    assert_eq!(global().output_handler().name(), "stdout");
}

#[test]
fn test_free_functions() {
    let (_guard, buffer) = fresh_global(Level::Debug);

    global::debug("debug");
    global::info_fmt(format_args!("info {}", 1));
    global::warn("warn");
    global::error("error");
    global::log(Level::Info, "generic");
    global::with_field("user", "alice").info("with field");

    let levels: Vec<String> = buffer
        .lines()
        .iter()
        .map(|l| parse(l)["level"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(levels, ["debug", "info", "warning", "error", "info", "info"]);
    assert_eq!(parse(&buffer.lines()[5])["user"], "alice");
}

#[test]
fn test_setters_reconfigure() {
    let (_guard, buffer) = fresh_global(Level::Warn);

    global::info("hidden");
    global::set_level(Level::Info);
    global::info("visible");
    assert_eq!(buffer.lines().len(), 1);

    let other = SharedBuffer::new();
    global::set_output(other.clone());
    global::set_now_func(|| DateTime::parse_from_rfc3339("2021-01-01T00:00:00Z").unwrap());
    global::set_report_caller(true);
    global::info("moved");

    assert_eq!(buffer.lines().len(), 1);
    let record = parse(&other.lines()[0]);
    assert_eq!(record["time"], "2021-01-01T00:00:00Z");
    assert!(record.get("file").is_some());
}

#[test]
fn test_configure_keeps_other_settings() {
    let (_guard, buffer) = fresh_global(Level::Debug);

    configure_global([with_consistent_ordering(true)]);
    global::debug("still debug");

    assert_eq!(global().level(), Level::Debug);
    assert_eq!(buffer.lines().len(), 1);
}

#[test]
fn test_new_global_resets() {
    let (_guard, buffer) = fresh_global(Level::Debug);

    new_global([with_output(buffer.clone())]);
    assert_eq!(global().level(), Level::Warn);
    global::info("suppressed");
    assert!(buffer.is_empty());
}

#[test]
fn test_global_fatal_exits() {
    let (_guard, buffer) = fresh_global(Level::Warn);
    let exits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&exits);
    configure_global([with_exit_func(move |code| {
        assert_eq!(code, 1);
        counter.fetch_add(1, Ordering::SeqCst);
    })]);

    global::fatal("plain");
    global::fatal_fmt(format_args!("fmt {}", 1));
    global::log_fmt(Level::Fatal, format_args!("generic"));

    assert_eq!(exits.load(Ordering::SeqCst), 3);
    assert_eq!(buffer.lines().len(), 3);
}

#[test]
fn test_adapters_on_global_logger() {
    let (_guard, buffer) = fresh_global(Level::Debug);

    let db = SqlLogger::new([with_global_logger(), rust_log_facade::adapters::with_trace(true)])
        .unwrap();
    db.trace(&Context::new(), Instant::now(), || ("SQL STATEMENT".into(), 10), None);
    assert!(buffer.contents().contains("\"rows\":10"));

    let web = WebLogger::with_logger(Logger::new([with_output(SharedBuffer::new())]));
    web.set_level(WebLevel::Error);
    assert_eq!(global().level(), Level::Error);
    assert_eq!(web.level(), WebLevel::Error);
}
