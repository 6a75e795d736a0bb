//! Tool: wait. Sleep for a number of milliseconds, then report back.
//!
//! Useful for exercising the execution bound from a client.

use std::time::{Duration, Instant};

use serde_json::{json, Value};

use agentic_context::{Arguments, HandlerError, ParamSpec, ParamType, ReturnType, ToolDescriptor};

const MAX_WAIT_MS: u64 = 600_000;

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new("wait", execute)
        .with_description("Sleep for the given number of milliseconds")
        .with_param(
            ParamSpec::required("millis", ParamType::Integer)
                .with_description("How long to sleep, in milliseconds"),
        )
        .with_returns(ReturnType::Object)
}

async fn execute(args: Arguments) -> Result<Value, HandlerError> {
    let raw = args.get("millis").cloned().unwrap_or(Value::Null);
    let millis = raw
        .as_u64()
        .filter(|ms| *ms <= MAX_WAIT_MS)
        .ok_or_else(|| {
            HandlerError::new(format!(
                "millis must be between 0 and {MAX_WAIT_MS}, got {raw}"
            ))
        })?;

    let started = Instant::now();
    tokio::time::sleep(Duration::from_millis(millis)).await;
    Ok(json!({
        "requested_ms": millis,
        "slept_ms": started.elapsed().as_millis() as u64,
    }))
}
