//! Hooks and context example
//!
//! Demonstrates a hook that copies a trace id from the request context into
//! every record, followed by a hook that redacts secrets.
//!
//! Run with: cargo run --example hooks_and_context

use rust_log_facade::adapters::{KeyValueLogger, WebLogger};
use rust_log_facade::prelude::*;

#[derive(Debug, Clone)]
struct TraceId(String);

struct TraceIdHook;

impl Hook for TraceIdHook {
    fn fire(&self, entry: &mut HookEntry) -> std::result::Result<bool, HookError> {
        let Some(TraceId(id)) = entry.context_value::<TraceId>().cloned() else {
            return Ok(false);
        };
        entry.set_field("trace_id", id);
        Ok(true)
    }
}

fn redact(entry: &mut HookEntry) -> std::result::Result<bool, HookError> {
    if entry.remove_field("password").is_none() {
        return Ok(false);
    }
    entry.set_field("password", "<redacted>");
    Ok(true)
}

fn main() -> Result<()> {
    println!("=== Rust Log Facade - Hooks and Context Example ===\n");

    let logger = Logger::new([
        with_level(Level::Debug),
        with_consistent_ordering(true),
        with_hook(TraceIdHook),
        with_hook_fn(redact),
    ]);

    println!("1. Context values picked up by a hook:");
    let ctx = Context::new().with_value(TraceId("4bf92f3577b34da6".to_string()));
    let request = logger.with_context(ctx);
    request.info("Handling request");
    request
        .with_field("user", "alice")
        .with_field("password", "hunter2")
        .warn("Login attempt");

    println!("\n2. Framework adapters share the same pipeline:");
    let web = WebLogger::with_logger(logger.clone());
    web.info_json(&serde_json::json!({ "method": "POST", "uri": "/login", "status": 401 }));

    let rpc = KeyValueLogger::new(logger);
    rpc.log(
        Level::Info,
        &["msg".into(), "rpc served".into(), "operation".into(), "/greeter/SayHello".into()],
    )?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
