//! End-to-end tests for the framework adapters

use rust_log_facade::adapters::{
    sql, tracer, KeyValueLogger, LogBridge, SqlLogger, TracerLogger, WebLogger, UNPAIRED_VALUE,
};
use rust_log_facade::prelude::*;
use std::time::Instant;

fn buffered(level: Level) -> (Logger, SharedBuffer) {
    let buffer = SharedBuffer::new();
    let logger = Logger::new([
        with_output(buffer.clone()),
        with_level(level),
        with_report_caller(true),
    ]);
    (logger, buffer)
}

fn parse(line: &str) -> serde_json::Value {
    serde_json::from_str(line).expect("valid JSON line")
}

// The `log` crate accepts a single logger per process, so everything that
// goes through the installed bridge lives in this one test.
#[test]
fn test_log_crate_bridge() {
    let (logger, buffer) = buffered(Level::Info);
    LogBridge::install(logger.clone()).expect("first install succeeds");
    assert!(LogBridge::install(logger).is_err());

    let expected = line!() + 1;
    log::info!(target: "payments", user = "alice", attempts = 3; "charged {} cents", 250);
    log::debug!("below the facade level");
    log::warn!("careful");

    let lines = buffer.lines();
    assert_eq!(lines.len(), 2);

    let record = parse(&lines[0]);
    assert_eq!(record["level"], "info");
    assert_eq!(record["msg"], "charged 250 cents");
    assert_eq!(record["target"], "payments");
    assert_eq!(record["user"], "alice");
    assert_eq!(record["attempts"], 3);
    assert!(record["file"]
        .as_str()
        .unwrap()
        .ends_with(&format!("adapter_tests.rs:{}", expected)));
    assert_eq!(record["function"], "adapter_tests");

    assert_eq!(parse(&lines[1])["level"], "warning");
}

#[test]
fn test_sql_trace_with_and_without_error() {
    let (logger, buffer) = buffered(Level::Debug);
    let db = SqlLogger::new([sql::with_logger(logger), sql::with_trace(true)]).unwrap();

    db.trace(&Context::new(), Instant::now(), || ("SQL STATEMENT".into(), 10), None);
    let failure = std::io::Error::new(std::io::ErrorKind::Other, "This is a test");
    db.trace(&Context::new(), Instant::now(), || ("SQL STATEMENT".into(), 0), Some(&failure));

    let contents = buffer.contents();
    assert!(contents.contains("\"rows\":10"));
    assert!(contents.contains("\"rows\":0"));
    assert!(contents.contains("This is a test"));
    assert!(!contents.contains("SQL STATEMENT"));
}

#[test]
fn test_sql_logger_without_logger_fails() {
    let err = SqlLogger::new([sql::with_trace(true)]).unwrap_err();
    assert!(err.to_string().contains("with_global_logger() or with_logger()"));
}

#[test]
fn test_tracer_lines() {
    let (logger, buffer) = buffered(Level::Debug);
    let dd = TracerLogger::new([tracer::with_logger(logger)]).unwrap();

    dd.log("Datadog Tracer v1.50.1 ERROR: lost connection to agent");
    dd.log("unstructured tracer chatter");

    let lines = buffer.lines();
    let parsed = parse(&lines[0]);
    assert_eq!(parsed["level"], "error");
    assert_eq!(parsed["msg"], "lost connection to agent");
    assert_eq!(parsed["source"], "Datadog Tracer v1.50.1");

    let fallback = parse(&lines[1]);
    assert_eq!(fallback["level"], "warning");
    assert!(fallback.get("log_parse_err").is_some());
}

#[test]
fn test_key_value_pairs() {
    let (logger, buffer) = buffered(Level::Debug);
    let rpc = KeyValueLogger::new(logger);

    rpc.log(Level::Warn, &[]).unwrap();
    rpc.log(
        Level::Info,
        &["msg".into(), "request served".into(), "code".into(), 0.into(), "orphan".into()],
    )
    .unwrap();

    let lines = buffer.lines();
    assert_eq!(lines.len(), 1);
    let record = parse(&lines[0]);
    assert_eq!(record["msg"], "request served");
    assert_eq!(record["code"], 0);
    assert_eq!(record["orphan"], UNPAIRED_VALUE);
}

#[test]
fn test_web_logger_json_messages() {
    let (logger, buffer) = buffered(Level::Info);
    let web = WebLogger::with_logger(logger);

    web.info_json(&serde_json::json!({ "method": "GET", "status": 200 }));
    web.debug("filtered");

    let lines = buffer.lines();
    assert_eq!(lines.len(), 1);
    let msg: serde_json::Value =
        serde_json::from_str(parse(&lines[0])["msg"].as_str().unwrap()).unwrap();
    assert_eq!(msg["status"], 200);
}
