//! Tool: divide. Divide one number by another.

use serde::Deserialize;
use serde_json::{json, Value};

use agentic_context::{Arguments, HandlerError, ParamSpec, ParamType, ReturnType, ToolDescriptor};

#[derive(Debug, Deserialize)]
struct DivideParams {
    a: f64,
    b: f64,
}

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new("divide", execute)
        .with_description("Divide a by b. Fails on division by zero")
        .with_param(ParamSpec::required("a", ParamType::Number).with_description("Dividend"))
        .with_param(ParamSpec::required("b", ParamType::Number).with_description("Divisor"))
        .with_returns(ReturnType::Number)
}

async fn execute(args: Arguments) -> Result<Value, HandlerError> {
    let params: DivideParams = args.parse()?;
    if params.b == 0.0 {
        return Err(HandlerError::new("division by zero"));
    }
    Ok(json!(params.a / params.b))
}
